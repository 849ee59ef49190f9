/// Oracle request assembly and drift-threshold logic
pub mod drift;

pub use drift::{analyze_drift, build_oracle_request};
