//! Request validation, advisory fan-out and result assembly

pub mod config;
pub mod error;
pub mod merge;
pub mod orchestrator;
pub mod request;
pub mod result;
pub mod stage;

pub use config::PipelineConfig;
pub use error::{PipelineError, ValidationError};
pub use merge::{merge, min_plan_steps, MergeReport, REQUIREMENTS_PROMPT};
pub use orchestrator::{resolve_stack, GenerationPipeline};
pub use request::{IdeaRequest, Mode};
pub use result::{Complexity, GenerationResult};
pub use stage::Stage;
