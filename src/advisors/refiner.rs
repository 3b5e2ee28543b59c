use super::error::AdvisorError;
use super::prompts;
use crate::llm::{Completion, LLMClient};
use crate::pipeline::Mode;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

pub const REFINE_PHASE: &str = "refine_idea";

/// Turns a rough idea into a clearer description
///
/// Implementations bound their own running time; callers do not wrap them in a timeout.
#[async_trait]
pub trait IdeaRefiner: Send + Sync {
    async fn refine(
        &self,
        idea: &str,
        target_users: Option<&str>,
        mode: Mode,
    ) -> Result<String, AdvisorError>;
}

pub struct LlmIdeaRefiner {
    client: Arc<dyn LLMClient>,
    timeout: Duration,
    min_len: usize,
}

impl LlmIdeaRefiner {
    pub fn new(client: Arc<dyn LLMClient>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            min_len: 30,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }
}

#[async_trait]
impl IdeaRefiner for LlmIdeaRefiner {
    async fn refine(
        &self,
        idea: &str,
        target_users: Option<&str>,
        mode: Mode,
    ) -> Result<String, AdvisorError> {
        let start = Instant::now();
        let user = prompts::refine_user(idea, target_users);
        let completion = Completion {
            system: prompts::refine_system(mode),
            user: &user,
            max_tokens: if mode.is_mvp() { 400 } else { 800 },
            temperature: 0.4,
            json_mode: false,
            phase: REFINE_PHASE,
        };

        let text = tokio::time::timeout(self.timeout, self.client.complete(completion))
            .await
            .map_err(|_| AdvisorError::timeout(start.elapsed()))??;

        let refined = text.trim();
        let len = refined.chars().count();
        if len <= self.min_len {
            return Err(AdvisorError::TooShort {
                len,
                min: self.min_len,
            });
        }

        debug!(
            chars = len,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Idea refined"
        );
        Ok(refined.to_string())
    }
}
