use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::{truncate_utf8_safe, AnalysisResult, HookError, ToolCallRequest};

/// Retention window for the event store
pub const MAX_EVENTS: usize = 100;

/// Payload preview budget inside an event record
pub const PREVIEW_CHARS: usize = 200;

/// Persisted record of one decision, read by the external monitor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionEvent<'a> {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub session_id: &'a str,
    pub tool_name: &'a str,
    pub tool_input: EventToolInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<&'a AnalysisResult>,
}

#[derive(Debug, Serialize)]
pub struct EventToolInput {
    pub file_path_or_command: String,
    pub preview: String,
}

/// Writes one JSON file per decision and keeps the store bounded.
///
/// Concurrent instances share this directory: keys carry a random
/// discriminator so appends never collide, and eviction races are benign
/// because deleting an already-removed file is a no-op.
pub struct EventPublisher {
    dir: PathBuf,
}

impl EventPublisher {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Persist a decision. All failures are swallowed by the caller; the
    /// verdict has already been made and must not be affected.
    pub fn publish(
        &self,
        request: &ToolCallRequest,
        result: &AnalysisResult,
    ) -> Result<(), HookError> {
        fs::create_dir_all(&self.dir)?;

        let event = DecisionEvent {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: if result.should_block { "blocked" } else { "allowed" },
            session_id: request.session_id.as_deref().unwrap_or(""),
            tool_name: &request.tool_name,
            tool_input: EventToolInput {
                file_path_or_command: request.file_path_or_command().to_string(),
                preview: truncate_utf8_safe(&request.payload(), PREVIEW_CHARS),
            },
            analysis: result.should_block.then_some(result),
        };

        let key = format!(
            "{}-{:04x}.json",
            chrono::Utc::now().timestamp_millis(),
            rand::random::<u16>()
        );
        let body = serde_json::to_vec_pretty(&event)
            .map_err(|e| HookError::PersistenceFailure(std::io::Error::other(e)))?;
        fs::write(self.dir.join(key), body)?;

        self.evict();
        Ok(())
    }

    /// Keep the newest MAX_EVENTS records by modification time. Best-effort:
    /// unreadable entries and failed deletions are skipped.
    fn evict(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };

        let mut records: Vec<(PathBuf, SystemTime)> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    let mtime = entry.metadata().ok()?.modified().ok()?;
                    Some((path, mtime))
                } else {
                    None
                }
            })
            .collect();

        if records.len() <= MAX_EVENTS {
            return;
        }

        records.sort_by_key(|(_, mtime)| *mtime);
        let excess = records.len() - MAX_EVENTS;
        for (path, _) in records.into_iter().take(excess) {
            if let Err(err) = fs::remove_file(&path) {
                tracing::debug!(?path, %err, "event eviction skipped a record");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HookInput, Mode};

    fn sample_request() -> ToolCallRequest {
        let input: HookInput = serde_json::from_str(
            r#"{"tool_name":"Bash","tool_input":{"command":"ls -la"},"session_id":"s1"}"#,
        )
        .unwrap();
        ToolCallRequest::from_hook_input(input).unwrap()
    }

    #[test]
    fn allowed_event_omits_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = EventPublisher::new(dir.path().to_path_buf());
        publisher
            .publish(&sample_request(), &AnalysisResult::allowed(Mode::Ruthless))
            .unwrap();

        let entry = fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let event: serde_json::Value =
            serde_json::from_slice(&fs::read(entry.path()).unwrap()).unwrap();
        assert_eq!(event["type"], "allowed");
        assert_eq!(event["sessionId"], "s1");
        assert_eq!(event["toolName"], "Bash");
        assert_eq!(event["toolInput"]["file_path_or_command"], "ls -la");
        assert!(event.get("analysis").is_none());
    }

    #[test]
    fn blocked_event_carries_full_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = EventPublisher::new(dir.path().to_path_buf());
        let result = AnalysisResult::blocked(
            crate::PhaseFinding {
                kind: crate::BlockKind::Danger,
                reason: "Attempting to delete root directory".to_string(),
                confidence: 0.95,
                what_user_asked: None,
                what_claude_is_doing: Some("Running: rm -rf /".to_string()),
                suggestion: None,
            },
            Mode::Mentor,
        );
        publisher.publish(&sample_request(), &result).unwrap();

        let entry = fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let event: serde_json::Value =
            serde_json::from_slice(&fs::read(entry.path()).unwrap()).unwrap();
        assert_eq!(event["type"], "blocked");
        assert_eq!(event["analysis"]["shouldBlock"], true);
        assert_eq!(event["analysis"]["type"], "danger");
        assert_eq!(event["analysis"]["confidence"], 0.95);
        assert_eq!(event["analysis"]["mode"], "mentor");
    }

    #[test]
    fn preview_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = EventPublisher::new(dir.path().to_path_buf());
        let input: HookInput = serde_json::from_str(&format!(
            r#"{{"tool_name":"Write","tool_input":{{"content":"{}"}}}}"#,
            "a".repeat(500)
        ))
        .unwrap();
        let request = ToolCallRequest::from_hook_input(input).unwrap();
        publisher
            .publish(&request, &AnalysisResult::allowed(Mode::Ruthless))
            .unwrap();

        let entry = fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let event: serde_json::Value =
            serde_json::from_slice(&fs::read(entry.path()).unwrap()).unwrap();
        let preview = event["toolInput"]["preview"].as_str().unwrap();
        assert!(preview.chars().count() <= PREVIEW_CHARS);
    }
}
