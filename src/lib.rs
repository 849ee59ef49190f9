use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Common types for the counter-agent PreToolUse hook.

/// Safely truncate a UTF-8 string to a maximum number of characters
pub fn truncate_utf8_safe(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Drift-judgment assembly and threshold logic
pub mod analysis;

/// Environment configuration
pub mod config;

/// User-intent extraction from the request's context sources
pub mod context;

/// Strict-order decision state machine
pub mod coordinator;

/// Typed error taxonomy
pub mod error;

/// Decision event store with bounded retention
pub mod events;

/// Verdict rendering for the two response channels
pub mod messages;

/// External reasoning oracle seam and the OpenAI implementation
pub mod providers;

/// Request normalization and tool classification
pub mod request;

/// Deterministic pattern scanners (secrets, dangerous commands)
pub mod scanners;

/// Cross-invocation persistent state (first-run marker, debug log)
pub mod state;

// Re-export commonly used types for convenience
pub use config::{Config, Mode, VisualStyle};
pub use coordinator::DecisionCoordinator;
pub use error::HookError;
pub use events::EventPublisher;
pub use providers::{DriftOracle, OpenAiOracle, OracleRequest};
pub use request::ToolCallRequest;
pub use state::StateStore;

/// Hook input as delivered on stdin. Two field-naming schemes have been in
/// circulation for the tool identifier and its parameters; both are accepted
/// here and reconciled by the normalizer.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: Option<String>,
    /// Legacy alias for `tool_name`
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub tool_input: Option<HashMap<String, serde_json::Value>>,
    /// Legacy alias for `tool_input`
    #[serde(default)]
    pub input: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub conversation_history: Option<serde_json::Value>,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
    #[serde(default)]
    pub recent_tools: Option<Vec<String>>,
}

/// Category of a blocking verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Security,
    Danger,
    Drift,
}

/// Final outcome of the pipeline for one request. Compiled once by the
/// decision coordinator; phases hand back a [`PhaseFinding`] instead and
/// never mutate an existing result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub should_block: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
    pub reason: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_user_asked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_claude_is_doing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub mode: Mode,
}

impl AnalysisResult {
    pub fn allowed(mode: Mode) -> Self {
        Self {
            should_block: false,
            kind: None,
            reason: String::new(),
            confidence: 0.0,
            what_user_asked: None,
            what_claude_is_doing: None,
            suggestion: None,
            mode,
        }
    }

    pub fn blocked(finding: PhaseFinding, mode: Mode) -> Self {
        Self {
            should_block: true,
            kind: Some(finding.kind),
            reason: finding.reason,
            confidence: finding.confidence.clamp(0.0, 1.0),
            what_user_asked: finding.what_user_asked,
            what_claude_is_doing: finding.what_claude_is_doing,
            suggestion: finding.suggestion,
            mode,
        }
    }
}

/// Positive outcome of a single analysis phase
#[derive(Debug, Clone)]
pub struct PhaseFinding {
    pub kind: BlockKind,
    pub reason: String,
    pub confidence: f64,
    pub what_user_asked: Option<String>,
    pub what_claude_is_doing: Option<String>,
    pub suggestion: Option<String>,
}

/// Structured verdict returned by the reasoning oracle
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftVerdict {
    pub should_interrupt: bool,
    pub confidence: f64,
    #[serde(default)]
    pub what_user_asked: String,
    #[serde(default)]
    pub what_claude_is_doing: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}
