use anyhow::{Context, Result};
use std::io::{self, Read, Write};

use counter_agent_hooks::{
    messages, AnalysisResult, Config, DecisionCoordinator, EventPublisher, HookInput, OpenAiOracle,
    StateStore, ToolCallRequest,
};

const EXIT_ALLOW: i32 = 0;
const EXIT_DENY: i32 = 2;

/// PreToolUse hook entry point. Reads one JSON request from stdin, runs the
/// decision pipeline, emits the verdict on both channels, and exits 0 or 2.
///
/// The pipeline is fail-open by design: any fault on this path resolves to
/// a plain allow with exit 0, as if the analysis were skipped. Blocking is
/// reserved for positive evidence, never for the hook's own malfunction.
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(%err, "internal error, failing open");
            println!("{}", messages::render_primary(&AnalysisResult::allowed(Config::from_env().mode)));
            EXIT_ALLOW
        }
    };

    // Flush both channels before the hard exit
    io::stdout().flush().ok();
    io::stderr().flush().ok();
    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // Best-effort .env next to the executable; the real environment always
    // wins over the file.
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let env_file = exe_dir.join(".env");
            if env_file.exists() {
                dotenvy::from_path(&env_file).ok();
            }
        }
    }

    let config = Config::from_env();
    let state = StateStore::new(&config.home_dir);
    init_tracing(&config, &state);

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;

    let hook_input: HookInput = match serde_json::from_str(&input) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(%err, "unparsable hook input, failing open");
            return Ok(emit(&AnalysisResult::allowed(config.mode), &config, &state));
        }
    };

    let request = match ToolCallRequest::from_hook_input(hook_input) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(%err, "malformed request, failing open");
            return Ok(emit(&AnalysisResult::allowed(config.mode), &config, &state));
        }
    };

    // Read-only tools resolve immediately: no phases, no event record
    if request.is_read_only() {
        return Ok(emit(&AnalysisResult::allowed(config.mode), &config, &state));
    }

    let oracle = OpenAiOracle::new(&config)?;
    let coordinator = DecisionCoordinator::new(&config, &oracle);
    let result = coordinator.evaluate(&request).await;

    let publisher = EventPublisher::new(config.events_dir());
    if let Err(err) = publisher.publish(&request, &result) {
        tracing::warn!(%err, "event publish failed, verdict unaffected");
    }

    Ok(emit(&result, &config, &state))
}

/// Render the verdict onto both channels and map it to the exit status.
fn emit(result: &AnalysisResult, config: &Config, state: &StateStore) -> i32 {
    println!("{}", messages::render_primary(result));

    let human = messages::render_human(result, config, state.first_run());
    if !human.is_empty() {
        eprintln!("{}", human);
    }

    if result.should_block {
        EXIT_DENY
    } else {
        EXIT_ALLOW
    }
}

fn init_tracing(config: &Config, state: &StateStore) {
    use tracing_subscriber::EnvFilter;

    if config.debug {
        std::fs::create_dir_all(state.root()).ok();
        if let Ok(log_file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(state.log_path())
        {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("debug"))
                .with_writer(std::sync::Mutex::new(log_file))
                .with_ansi(false)
                .try_init()
                .ok();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(io::stderr)
        .try_init()
        .ok();
}
