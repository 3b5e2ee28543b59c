use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use tracing::debug;

/// Client used when no backend is reachable
///
/// Every call fails with [`BackendError::Unavailable`], so generation degrades to the
/// procedural baseline.
#[derive(Debug, Default, Clone)]
pub struct OfflineClient;

#[async_trait]
impl LLMClient for OfflineClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        debug!(
            phase = request.phase.as_deref().unwrap_or("unknown"),
            "offline client refusing request"
        );
        Err(BackendError::unavailable("running offline"))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
