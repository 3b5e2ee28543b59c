use super::error::AdvisorError;
use super::prompts;
use crate::domain::{DomainModel, DomainShapeError};
use crate::llm::{extract_json_object, Completion, LLMClient};
use crate::pipeline::Mode;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const DOMAIN_PHASE: &str = "analyze_domain";

/// Extracts a structured domain model from a refined idea
#[async_trait]
pub trait DomainAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        refined_idea: &str,
        target_users: Option<&str>,
        mode: Mode,
    ) -> Result<DomainModel, AdvisorError>;
}

pub struct LlmDomainAnalyzer {
    client: Arc<dyn LLMClient>,
}

impl LlmDomainAnalyzer {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

impl From<DomainShapeError> for AdvisorError {
    fn from(err: DomainShapeError) -> Self {
        AdvisorError::SchemaMismatch(err.to_string())
    }
}

/// Salvages a JSON object from `text` and accepts it only as a complete domain model
pub fn parse_domain(text: &str) -> Result<DomainModel, AdvisorError> {
    let object = extract_json_object(text)?;
    Ok(DomainModel::from_value(serde_json::Value::Object(object))?)
}

#[async_trait]
impl DomainAnalyzer for LlmDomainAnalyzer {
    async fn analyze(
        &self,
        refined_idea: &str,
        target_users: Option<&str>,
        mode: Mode,
    ) -> Result<DomainModel, AdvisorError> {
        let user = prompts::domain_user(refined_idea, target_users);
        let text = self
            .client
            .complete(Completion {
                system: prompts::domain_system(mode),
                user: &user,
                max_tokens: if mode.is_mvp() { 1200 } else { 2500 },
                temperature: 0.3,
                json_mode: true,
                phase: DOMAIN_PHASE,
            })
            .await?;

        let model = parse_domain(&text)?;
        debug!(
            entities = model.entities.len(),
            endpoints = model.endpoints.len(),
            pages = model.pages.len(),
            "Domain model accepted"
        );
        Ok(model)
    }
}
