//! ideaforge - implementation packages for AI code generators
//!
//! Takes a free-text product idea and produces a refined description, an
//! implementation plan, a recommended technology stack, a set of prompts for AI
//! code-generation tools and supporting documentation.
//!
//! # Core Concepts
//!
//! - **Feature flags**: capabilities detected from the idea by keyword matching
//! - **Advisors**: optional LLM-backed collaborators that refine the idea, extract a
//!   domain model and draft a product plan; any of them may fail without failing
//!   the request
//! - **Procedural baseline**: deterministic, template-built output that every
//!   request falls back to
//!
//! # Example Usage
//!
//! ```ignore
//! use ideaforge::{GenerationPipeline, IdeaRequest, Mode, OfflineClient, PipelineConfig};
//! use std::sync::Arc;
//!
//! async fn package() -> Result<(), ideaforge::PipelineError> {
//!     let pipeline = GenerationPipeline::with_llm(Arc::new(OfflineClient), PipelineConfig::default());
//!     let request = IdeaRequest::new("A marketplace for local bakers").with_mode(Mode::Mvp);
//!
//!     let result = pipeline.generate(&request).await?;
//!     println!("{} prompts, complexity {}", result.prompt_count, result.estimated_complexity);
//!     Ok(())
//! }
//! ```

pub mod advisors;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod features;
pub mod llm;
pub mod pipeline;
pub mod procedural;
pub mod progress;
pub mod stack;
pub mod tools;
pub mod usage;

pub use config::{ConfigError, IdeaforgeConfig};
pub use features::{detect, FeatureFlag, FeatureFlagSet};
pub use llm::{BackendError, LLMClient, MockLLMClient, MockResponse, OfflineClient};
pub use pipeline::{
    Complexity, GenerationPipeline, GenerationResult, IdeaRequest, Mode, PipelineConfig,
    PipelineError, ValidationError,
};
pub use stack::{choose, StackChoice};
pub use tools::{ToolKind, ToolProfile, ToolProfileRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_ideaforge() {
        assert_eq!(NAME, "ideaforge");
    }
}
