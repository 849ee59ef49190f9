use serde::Serialize;
use std::path::PathBuf;

/// Personality presentation for block messages. Rendering only; the tag has
/// no effect on the block/allow decision itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Ruthless,
    Mentor,
    Stealth,
}

impl Mode {
    fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "mentor" => Mode::Mentor,
            "stealth" => Mode::Stealth,
            _ => Mode::Ruthless,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualStyle {
    Standard,
    Minimal,
}

/// Environment configuration with defaults and range clamping.
///
/// Loading never fails: a bare environment degrades the pipeline (no oracle,
/// default thresholds) instead of aborting it.
#[derive(Debug, Clone)]
pub struct Config {
    // Oracle call tuning
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
    pub openai_temperature: f32,
    pub openai_max_tokens: u32,

    // Decision tuning
    pub interrupt_threshold: f64,

    // Per-phase kill switches, default enabled
    pub enable_ai_agent: bool,
    pub enable_heuristics: bool,
    pub enable_secrets_check: bool,

    // Presentation
    pub mode: Mode,
    pub visual_style: VisualStyle,
    pub debug: bool,

    /// Root for the event store, first-run marker, and debug log
    pub home_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_timeout_secs: 10,
            openai_temperature: 0.2,
            openai_max_tokens: 500,
            interrupt_threshold: 0.7,
            enable_ai_agent: true,
            enable_heuristics: true,
            enable_secrets_check: true,
            mode: Mode::Ruthless,
            visual_style: VisualStyle::Standard,
            debug: false,
            home_dir: default_home(),
        }
    }
}

fn default_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir())
        .join(".counter-agent")
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(val) => !matches!(val.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off"),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let openai_timeout_secs = std::env::var("OPENAI_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.openai_timeout_secs)
            .clamp(1, 60);

        let openai_temperature = std::env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(defaults.openai_temperature)
            .clamp(0.0, 2.0);

        let openai_max_tokens = std::env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.openai_max_tokens)
            .clamp(100, 4000);

        let interrupt_threshold = std::env::var("INTERRUPT_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(defaults.interrupt_threshold)
            .clamp(0.0, 1.0);

        let visual_style = match std::env::var("VISUAL_STYLE")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "minimal" => VisualStyle::Minimal,
            _ => VisualStyle::Standard,
        };

        Config {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or(defaults.openai_base_url),
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_timeout_secs,
            openai_temperature,
            openai_max_tokens,
            interrupt_threshold,
            enable_ai_agent: env_bool("ENABLE_AI_AGENT", true),
            enable_heuristics: env_bool("ENABLE_HEURISTICS", true),
            enable_secrets_check: env_bool("ENABLE_SECRETS_CHECK", true),
            mode: Mode::parse(&std::env::var("COUNTER_AGENT_MODE").unwrap_or_default()),
            visual_style,
            debug: env_bool("DEBUG", false),
            home_dir: std::env::var("COUNTER_AGENT_HOME")
                .map(PathBuf::from)
                .unwrap_or(defaults.home_dir),
        }
    }

    pub fn events_dir(&self) -> PathBuf {
        self.home_dir.join("events")
    }
}
