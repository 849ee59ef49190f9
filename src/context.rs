use std::fs;

use crate::ToolCallRequest;

/// How much of the transcript tail is considered context
pub const CONTEXT_TAIL_CHARS: usize = 5000;

/// Emitted when every extraction strategy comes up empty
pub const NO_CONTEXT_SENTINEL: &str = "(no conversation context available)";

type Extractor = fn(&ToolCallRequest) -> Option<String>;

/// Extraction strategies in priority order. The fallback order, not any
/// single source, is the contract: each source may be partially available
/// and the chain degrades instead of failing.
const EXTRACTORS: &[Extractor] = &[
    transcript_tail,
    explicit_prompt,
    history_lines,
    user_message,
    synthetic_summary,
];

/// Best-effort summary of user intent for the drift oracle.
pub fn extract_context(request: &ToolCallRequest) -> String {
    for extractor in EXTRACTORS {
        if let Some(text) = extractor(request) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    NO_CONTEXT_SENTINEL.to_string()
}

/// Last ~5000 characters of the referenced transcript file, if readable.
fn transcript_tail(request: &ToolCallRequest) -> Option<String> {
    let path = request.transcript_path.as_deref()?;
    match fs::read_to_string(path) {
        Ok(text) => {
            let chars: Vec<char> = text.chars().collect();
            let start = chars.len().saturating_sub(CONTEXT_TAIL_CHARS);
            Some(chars[start..].iter().collect())
        }
        Err(err) => {
            tracing::debug!(path, %err, "transcript unreadable, falling through");
            None
        }
    }
}

fn explicit_prompt(request: &ToolCallRequest) -> Option<String> {
    request.prompt.clone()
}

/// Structured history serialized as `role: content` lines; a plain string
/// is used verbatim.
fn history_lines(request: &ToolCallRequest) -> Option<String> {
    let history = request.conversation_history.as_ref()?;
    if let Some(text) = history.as_str() {
        return Some(text.to_string());
    }
    let entries = history.as_array()?;
    let lines: Vec<String> = entries
        .iter()
        .filter_map(|entry| {
            let role = entry.get("role")?.as_str()?;
            let content = entry.get("content")?.as_str()?;
            Some(format!("{}: {}", role, content))
        })
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn user_message(request: &ToolCallRequest) -> Option<String> {
    request
        .user_message
        .clone()
        .or_else(|| request.user_prompt.clone())
}

/// Minimal summary from what the request itself carries.
fn synthetic_summary(request: &ToolCallRequest) -> Option<String> {
    let session = request.session_id.as_deref()?;
    let mut summary = format!("Session {} in progress.", session);
    if !request.recent_tools.is_empty() {
        summary.push_str(&format!(
            " Recent tools: {}.",
            request.recent_tools.join(", ")
        ));
    }
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HookInput;
    use std::io::Write;

    fn base_request() -> ToolCallRequest {
        let input: HookInput =
            serde_json::from_str(r#"{"tool_name":"Write","tool_input":{}}"#).unwrap();
        ToolCallRequest::from_hook_input(input).unwrap()
    }

    #[test]
    fn transcript_wins_when_readable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "user: please build a REST API").unwrap();

        let mut req = base_request();
        req.transcript_path = Some(file.path().to_string_lossy().to_string());
        req.prompt = Some("should not be used".to_string());

        assert_eq!(extract_context(&req), "user: please build a REST API");
    }

    #[test]
    fn transcript_tail_is_bounded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let long = "x".repeat(CONTEXT_TAIL_CHARS + 500);
        write!(file, "{}", long).unwrap();

        let mut req = base_request();
        req.transcript_path = Some(file.path().to_string_lossy().to_string());

        assert_eq!(extract_context(&req).chars().count(), CONTEXT_TAIL_CHARS);
    }

    #[test]
    fn unreadable_transcript_falls_through_to_prompt() {
        let mut req = base_request();
        req.transcript_path = Some("/nonexistent/transcript.jsonl".to_string());
        req.prompt = Some("add login form".to_string());

        assert_eq!(extract_context(&req), "add login form");
    }

    #[test]
    fn structured_history_serializes_role_lines() {
        let mut req = base_request();
        req.conversation_history = Some(serde_json::json!([
            {"role": "user", "content": "fix the parser"},
            {"role": "assistant", "content": "on it"}
        ]));

        assert_eq!(
            extract_context(&req),
            "user: fix the parser\nassistant: on it"
        );
    }

    #[test]
    fn textual_history_used_verbatim() {
        let mut req = base_request();
        req.conversation_history = Some(serde_json::json!("raw history blob"));
        assert_eq!(extract_context(&req), "raw history blob");
    }

    #[test]
    fn user_message_before_user_prompt() {
        let mut req = base_request();
        req.user_message = Some("from message".to_string());
        req.user_prompt = Some("from prompt".to_string());
        assert_eq!(extract_context(&req), "from message");

        req.user_message = None;
        assert_eq!(extract_context(&req), "from prompt");
    }

    #[test]
    fn synthetic_summary_from_session() {
        let mut req = base_request();
        req.session_id = Some("abc123".to_string());
        req.recent_tools = vec!["Read".to_string(), "Edit".to_string()];

        let ctx = extract_context(&req);
        assert!(ctx.contains("abc123"));
        assert!(ctx.contains("Read, Edit"));
    }

    #[test]
    fn sentinel_when_nothing_available() {
        assert_eq!(extract_context(&base_request()), NO_CONTEXT_SENTINEL);
    }

    #[test]
    fn empty_prompt_falls_through() {
        let mut req = base_request();
        req.prompt = Some("   ".to_string());
        req.user_message = Some("real intent".to_string());
        assert_eq!(extract_context(&req), "real intent");
    }
}
