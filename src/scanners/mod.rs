/// Credential-signature scan over the action payload
pub mod secrets;

/// Dangerous-command scan over shell payloads
pub mod heuristics;

pub use heuristics::scan_dangerous_command;
pub use secrets::scan_secrets;
