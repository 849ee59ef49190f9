use serde_json::Value;
use std::collections::HashMap;

use crate::{HookError, HookInput};

/// Tools that only inspect, search, or delegate. They are never blocked and
/// bypass every analysis phase.
pub const READ_ONLY_TOOLS: &[&str] = &[
    "Read",
    "Glob",
    "Grep",
    "LS",
    "NotebookRead",
    "WebFetch",
    "WebSearch",
    "Task",
    "TodoRead",
    "BashOutput",
];

/// One evaluated unit in canonical form. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    pub tool_name: String,
    pub tool_input: HashMap<String, Value>,
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    pub prompt: Option<String>,
    pub conversation_history: Option<Value>,
    pub user_message: Option<String>,
    pub user_prompt: Option<String>,
    pub recent_tools: Vec<String>,
}

impl ToolCallRequest {
    /// Reconcile the two field-naming schemes into one canonical shape.
    /// The current scheme (`tool_name`/`tool_input`) wins over the legacy
    /// one (`tool`/`input`) when both are present.
    pub fn from_hook_input(input: HookInput) -> Result<Self, HookError> {
        let tool_name = input
            .tool_name
            .or(input.tool)
            .filter(|name| !name.trim().is_empty())
            .ok_or(HookError::MalformedRequest)?;

        let tool_input = input.tool_input.or(input.input).unwrap_or_default();

        Ok(Self {
            tool_name,
            tool_input,
            session_id: input.session_id,
            transcript_path: input.transcript_path,
            prompt: input.prompt,
            conversation_history: input.conversation_history,
            user_message: input.user_message,
            user_prompt: input.user_prompt,
            recent_tools: input.recent_tools.unwrap_or_default(),
        })
    }

    pub fn is_read_only(&self) -> bool {
        READ_ONLY_TOOLS.contains(&self.tool_name.as_str())
    }

    pub fn is_shell_command(&self) -> bool {
        self.tool_name == "Bash"
    }

    /// Textual payload of the action. Parameter fields are checked in a
    /// fixed priority order, first non-empty wins: file content, then an
    /// edit fragment, then a batch of edit fragments, then a command string.
    pub fn payload(&self) -> String {
        if let Some(content) = self.str_param("content") {
            return content.to_string();
        }
        if let Some(new_string) = self.str_param("new_string") {
            return new_string.to_string();
        }
        if let Some(edits) = self.tool_input.get("edits").and_then(|v| v.as_array()) {
            let joined = edits
                .iter()
                .filter_map(|edit| edit.get("new_string")?.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            if !joined.is_empty() {
                return joined;
            }
        }
        if let Some(command) = self.str_param("command") {
            return command.to_string();
        }
        String::new()
    }

    pub fn command(&self) -> &str {
        self.str_param("command").unwrap_or("")
    }

    pub fn file_path(&self) -> &str {
        self.str_param("file_path").unwrap_or("")
    }

    /// Target identifier for event previews: the file path for edit-like
    /// tools, otherwise the shell command.
    pub fn file_path_or_command(&self) -> &str {
        let path = self.file_path();
        if !path.is_empty() {
            path
        } else {
            self.command()
        }
    }

    fn str_param(&self, key: &str) -> Option<&str> {
        self.tool_input
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}
