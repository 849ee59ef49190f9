use crate::providers::{DriftOracle, OracleRequest};
use crate::{BlockKind, Config, PhaseFinding, ToolCallRequest};

/// Payload preview budget for the oracle request
pub const PAYLOAD_PREVIEW_CHARS: usize = 1500;

const TRUNCATION_MARKER: &str = "...[truncated]";

/// Technology vocabulary scanned out of the target path and payload.
/// Surfaced to the oracle as hints only, never as authoritative signals.
const TECH_KEYWORDS: &[&str] = &[
    "graphql",
    "rest",
    "grpc",
    "react",
    "vue",
    "angular",
    "svelte",
    "docker",
    "kubernetes",
    "terraform",
    "postgres",
    "mysql",
    "mongodb",
    "redis",
    "sqlite",
    "kafka",
];

const SYSTEM_INSTRUCTION: &str = "\
You supervise an autonomous coding agent. Given the recent conversation and \
the action the agent is about to take, decide whether the action drifts from \
what the user asked for. Flag intent mismatch, logic errors, and dangerous \
patterns. Be conservative: interrupt only when the divergence is clear, and \
report your confidence honestly. Respond with the requested JSON verdict.";

fn tech_hints(request: &ToolCallRequest, payload: &str) -> Vec<&'static str> {
    let haystack = format!(
        "{}\n{}",
        request.file_path_or_command().to_ascii_lowercase(),
        payload.to_ascii_lowercase()
    );
    TECH_KEYWORDS
        .iter()
        .filter(|kw| haystack.contains(*kw))
        .copied()
        .collect()
}

fn payload_preview(payload: &str) -> String {
    if payload.chars().count() <= PAYLOAD_PREVIEW_CHARS {
        payload.to_string()
    } else {
        let head: String = payload.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
        format!("{}{}", head, TRUNCATION_MARKER)
    }
}

/// Assemble the oracle request from the extracted context and the
/// normalized action.
pub fn build_oracle_request(
    context: &str,
    request: &ToolCallRequest,
    payload: &str,
) -> OracleRequest {
    let mut user_content = format!(
        "CONVERSATION CONTEXT:\n{}\n\nPROPOSED ACTION:\ntool: {}\ntarget: {}\npayload:\n{}",
        context,
        request.tool_name,
        request.file_path_or_command(),
        payload_preview(payload),
    );

    let hints = tech_hints(request, payload);
    if !hints.is_empty() {
        user_content.push_str(&format!(
            "\n\nTECHNOLOGY HINTS (derived, not authoritative): {}",
            hints.join(", ")
        ));
    }

    OracleRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        user_content,
    }
}

/// Run the drift phase. Blocks only when the oracle says interrupt AND its
/// confidence clears the configured threshold (inclusive). Every failure
/// mode of the call is absorbed here as "no opinion".
pub async fn analyze_drift<O: DriftOracle>(
    config: &Config,
    oracle: &O,
    context: &str,
    request: &ToolCallRequest,
    payload: &str,
) -> Option<PhaseFinding> {
    let oracle_request = build_oracle_request(context, request, payload);

    let verdict = match oracle.judge(&oracle_request).await {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::warn!(%err, "drift oracle unavailable, phase abstains");
            return None;
        }
    };

    let confidence = verdict.confidence.clamp(0.0, 1.0);
    if !verdict.should_interrupt || confidence < config.interrupt_threshold {
        return None;
    }

    Some(PhaseFinding {
        kind: BlockKind::Drift,
        reason: if verdict.reason.is_empty() {
            "Action diverges from the user's request".to_string()
        } else {
            verdict.reason
        },
        confidence,
        what_user_asked: Some(verdict.what_user_asked).filter(|s| !s.is_empty()),
        what_claude_is_doing: Some(verdict.what_claude_is_doing).filter(|s| !s.is_empty()),
        suggestion: verdict.suggestion.filter(|s| !s.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HookInput;

    fn request(json: &str) -> ToolCallRequest {
        let input: HookInput = serde_json::from_str(json).unwrap();
        ToolCallRequest::from_hook_input(input).unwrap()
    }

    #[test]
    fn preview_is_truncated_with_marker() {
        let long = "y".repeat(PAYLOAD_PREVIEW_CHARS + 100);
        let preview = payload_preview(&long);
        assert!(preview.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            preview.chars().count(),
            PAYLOAD_PREVIEW_CHARS + TRUNCATION_MARKER.chars().count()
        );

        assert_eq!(payload_preview("short"), "short");
    }

    #[test]
    fn oracle_request_carries_context_tool_and_payload() {
        let req = request(
            r#"{"tool_name":"Write","tool_input":{"file_path":"src/schema.rs","content":"use graphql;"}}"#,
        );
        let oracle_request = build_oracle_request("user asked for a REST API", &req, "use graphql;");
        assert!(oracle_request.user_content.contains("user asked for a REST API"));
        assert!(oracle_request.user_content.contains("tool: Write"));
        assert!(oracle_request.user_content.contains("src/schema.rs"));
        assert!(oracle_request.user_content.contains("use graphql;"));
    }

    #[test]
    fn tech_hints_surface_keywords() {
        let req = request(
            r#"{"tool_name":"Write","tool_input":{"file_path":"api/graphql_schema.py","content":"import graphene"}}"#,
        );
        let oracle_request = build_oracle_request("ctx", &req, "import graphene  # graphql");
        assert!(oracle_request.user_content.contains("TECHNOLOGY HINTS"));
        assert!(oracle_request.user_content.contains("graphql"));
    }

    #[test]
    fn no_hint_section_without_keywords() {
        let req = request(r#"{"tool_name":"Write","tool_input":{"content":"plain text"}}"#);
        let oracle_request = build_oracle_request("ctx", &req, "plain text");
        assert!(!oracle_request.user_content.contains("TECHNOLOGY HINTS"));
    }
}
