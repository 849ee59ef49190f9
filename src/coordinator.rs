use crate::analysis::analyze_drift;
use crate::context::extract_context;
use crate::providers::DriftOracle;
use crate::scanners::{scan_dangerous_command, scan_secrets};
use crate::{truncate_utf8_safe, AnalysisResult, BlockKind, Config, PhaseFinding, ToolCallRequest};

/// Runs the three analysis phases in strict order with short-circuit on the
/// first positive finding, then compiles the terminal [`AnalysisResult`].
///
/// Phase order is the contract: ReadOnlyCheck, then secrets, then drift,
/// then heuristics. A disabled phase behaves as "yields nothing". At most
/// one phase contributes the blocking verdict per request.
pub struct DecisionCoordinator<'a, O: DriftOracle> {
    config: &'a Config,
    oracle: &'a O,
}

impl<'a, O: DriftOracle> DecisionCoordinator<'a, O> {
    pub fn new(config: &'a Config, oracle: &'a O) -> Self {
        Self { config, oracle }
    }

    pub async fn evaluate(&self, request: &ToolCallRequest) -> AnalysisResult {
        let mode = self.config.mode;

        if request.is_read_only() {
            tracing::debug!(tool = %request.tool_name, "read-only tool, bypassing analysis");
            return AnalysisResult::allowed(mode);
        }

        let context = extract_context(request);
        let payload = request.payload();

        // Phase 1: secret scan, deterministic and never uncertain
        if self.config.enable_secrets_check {
            if let Some(label) = scan_secrets(&payload) {
                tracing::info!(tool = %request.tool_name, label, "secret phase blocked");
                return AnalysisResult::blocked(
                    PhaseFinding {
                        kind: BlockKind::Security,
                        reason: format!("Payload contains a credential: {}", label),
                        confidence: 1.0,
                        what_user_asked: Some(truncate_utf8_safe(&context, 200)),
                        what_claude_is_doing: Some(format!(
                            "Embedding a {} in a {} call",
                            label, request.tool_name
                        )),
                        suggestion: Some(
                            "Move the credential to an environment variable or secret store"
                                .to_string(),
                        ),
                    },
                    mode,
                );
            }
        }

        // Phase 2: external drift judgment, the only blocking external call
        if self.config.enable_ai_agent && !self.config.openai_api_key.is_empty() {
            if let Some(finding) =
                analyze_drift(self.config, self.oracle, &context, request, &payload).await
            {
                tracing::info!(tool = %request.tool_name, "drift phase blocked");
                return AnalysisResult::blocked(finding, mode);
            }
        }

        // Phase 3: dangerous-command heuristics, shell tools only
        if self.config.enable_heuristics && request.is_shell_command() {
            if let Some(label) = scan_dangerous_command(request.command()) {
                tracing::info!(tool = %request.tool_name, label, "heuristic phase blocked");
                return AnalysisResult::blocked(
                    PhaseFinding {
                        kind: BlockKind::Danger,
                        reason: label.to_string(),
                        confidence: 0.95,
                        what_user_asked: Some(truncate_utf8_safe(&context, 200)),
                        what_claude_is_doing: Some(format!(
                            "Running: {}",
                            truncate_utf8_safe(request.command(), 200)
                        )),
                        suggestion: None,
                    },
                    mode,
                );
            }
        }

        AnalysisResult::allowed(mode)
    }
}
