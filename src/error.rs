use thiserror::Error;

/// Error taxonomy for the hook pipeline.
///
/// Every variant is recovered locally and resolves to an allow; none of them
/// may surface to the host as a non-zero, non-two exit status. The pipeline
/// blocks on positive evidence only, never on its own malfunction.
#[derive(Debug, Error)]
pub enum HookError {
    /// Neither field-naming scheme yielded a tool name
    #[error("malformed request: no tool name in either field scheme")]
    MalformedRequest,

    /// Oracle timeout, transport error, or unparsable verdict. Absorbed
    /// inside the drift phase; the pipeline proceeds to heuristics.
    #[error("oracle failure: {0}")]
    OracleFailure(String),

    /// Event write or eviction error. Best-effort, never affects the verdict.
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] std::io::Error),
}
