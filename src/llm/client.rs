use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse};
use async_trait::async_trait;

/// Parameters of a single system + user completion
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub json_mode: bool,
    pub phase: &'a str,
}

#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }

    /// Sends a system + user prompt pair and returns the response text
    async fn complete(&self, completion: Completion<'_>) -> Result<String, BackendError> {
        let request = LLMRequest::new(vec![
            ChatMessage::system(completion.system),
            ChatMessage::user(completion.user),
        ])
        .with_max_tokens(completion.max_tokens)
        .with_temperature(completion.temperature)
        .with_json_mode(completion.json_mode)
        .with_phase(completion.phase);

        Ok(self.chat(request).await?.content)
    }
}
