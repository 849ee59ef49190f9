use crate::{AnalysisResult, Config, Mode, VisualStyle};

/// Rendering of the terminal verdict into the host's two response channels.
/// The personality mode shapes the phrasing only; the decision is fixed
/// before anything here runs.

const FIRST_RUN_BANNER: &str =
    "counter-agent is active: mutating tool calls are screened before they run.";

fn opening_phrase(mode: Mode) -> &'static str {
    match mode {
        Mode::Ruthless => "⛔ COUNTER-AGENT: action blocked.",
        Mode::Mentor => "🧭 Hold on — let's look at this together before it runs.",
        Mode::Stealth => "action blocked",
    }
}

/// Primary machine-readable channel (stdout).
pub fn render_primary(result: &AnalysisResult) -> String {
    let value = if result.should_block {
        serde_json::json!({ "action": "deny", "message": result.reason })
    } else {
        serde_json::json!({ "action": "allow" })
    };
    value.to_string()
}

/// Secondary human-readable channel (stderr). Empty for a plain allow after
/// the first run.
pub fn render_human(result: &AnalysisResult, config: &Config, first_run: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    if first_run {
        lines.push(FIRST_RUN_BANNER.to_string());
    }

    if result.should_block {
        lines.push(opening_phrase(result.mode).to_string());

        if config.visual_style == VisualStyle::Minimal {
            lines.push(format!(
                "{} ({:.0}% confidence)",
                result.reason,
                result.confidence * 100.0
            ));
        } else {
            if let (Some(asked), Some(doing)) =
                (&result.what_user_asked, &result.what_claude_is_doing)
            {
                lines.push(format!("  You asked for: {}", asked));
                lines.push(format!("  About to do:   {}", doing));
            }
            lines.push(format!("  Reason: {}", result.reason));
            lines.push(format!("  Confidence: {:.0}%", result.confidence * 100.0));
            if let Some(suggestion) = &result.suggestion {
                lines.push(format!("  Suggestion: {}", suggestion));
            }
        }
    }

    lines.join("\n")
}
