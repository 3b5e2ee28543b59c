use super::error::AdvisorError;
use super::prompts;
use crate::features::FeatureFlagSet;
use crate::llm::{extract_json_object, Completion, LLMClient};
use crate::pipeline::{IdeaRequest, Mode};
use crate::stack::StackChoice;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const PRODUCT_PHASE: &str = "generate_product";

/// Keys a product response must carry to be considered at all
pub const REQUIRED_PRODUCT_KEYS: &[&str] = &["implementation_plan", "tech_stack", "prompts", "docs"];

/// Everything the product generator needs, owned so it can cross task boundaries
#[derive(Debug, Clone)]
pub struct ProductBrief {
    pub idea: String,
    pub mode: Mode,
    pub flags: FeatureFlagSet,
    pub stack: StackChoice,
    pub target_users: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub constraints: Vec<String>,
    pub industry: Option<String>,
    pub preferred_stack: Option<String>,
}

impl ProductBrief {
    pub fn new(
        request: &IdeaRequest,
        refined_idea: &str,
        flags: &FeatureFlagSet,
        stack: &StackChoice,
    ) -> Self {
        Self {
            idea: refined_idea.to_string(),
            mode: request.mode,
            flags: flags.clone(),
            stack: stack.clone(),
            target_users: request.target_users.clone(),
            budget: request.budget.clone(),
            timeline: request.timeline.clone(),
            constraints: request.constraints.clone(),
            industry: request.industry.clone(),
            preferred_stack: request.preferred_stack.clone(),
        }
    }
}

/// The parts of a product response that can compete with procedural output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPayload {
    /// Present only when the response plan is an array of strings
    pub implementation_plan: Option<Vec<String>>,
    /// Present only when `prompts.product_requirements` is a string
    pub product_requirements: Option<String>,
}

impl ProductPayload {
    /// Checks required keys, then keeps the well-typed fields
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, AdvisorError> {
        let missing: Vec<&str> = REQUIRED_PRODUCT_KEYS
            .iter()
            .copied()
            .filter(|key| !object.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(AdvisorError::SchemaMismatch(format!(
                "product response is missing required keys: {}",
                missing.join(", ")
            )));
        }

        let implementation_plan = object
            .get("implementation_plan")
            .and_then(Value::as_array)
            .and_then(|steps| {
                steps
                    .iter()
                    .map(|step| step.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
            });

        let product_requirements = object
            .get("prompts")
            .and_then(|prompts| prompts.get("product_requirements"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            implementation_plan,
            product_requirements,
        })
    }
}

/// Produces a competing plan and requirements narrative
#[async_trait]
pub trait ProductGenerator: Send + Sync {
    async fn generate(&self, brief: &ProductBrief) -> Result<ProductPayload, AdvisorError>;
}

pub struct LlmProductGenerator {
    client: Arc<dyn LLMClient>,
}

impl LlmProductGenerator {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductGenerator for LlmProductGenerator {
    async fn generate(&self, brief: &ProductBrief) -> Result<ProductPayload, AdvisorError> {
        let system = prompts::product_system(&brief.flags, &brief.stack, brief.mode);
        let user = prompts::product_user(brief);
        let text = self
            .client
            .complete(Completion {
                system: &system,
                user: &user,
                max_tokens: if brief.mode.is_mvp() { 2048 } else { 4096 },
                temperature: 0.7,
                json_mode: true,
                phase: PRODUCT_PHASE,
            })
            .await?;

        let payload = ProductPayload::from_object(&extract_json_object(&text)?)?;
        debug!(
            plan_steps = payload.implementation_plan.as_ref().map(Vec::len),
            requirements_chars = payload.product_requirements.as_ref().map(String::len),
            "Product payload accepted"
        );
        Ok(payload)
    }
}
