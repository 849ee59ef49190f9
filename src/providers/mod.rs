use std::future::Future;

use crate::DriftVerdict;

/// OpenAI chat-completions oracle client
pub mod ai;

pub use ai::OpenAiOracle;

/// One assembled judgment request for the reasoning oracle.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub system_instruction: String,
    pub user_content: String,
}

/// Seam for the external reasoning oracle: submit context plus proposed
/// action, receive a structured verdict or a failure. The decision logic
/// depends only on this trait, never on a vendor or protocol.
pub trait DriftOracle {
    fn judge(
        &self,
        request: &OracleRequest,
    ) -> impl Future<Output = anyhow::Result<DriftVerdict>> + Send;
}
