//! Advisory collaborators backed by an LLM
//!
//! Each advisor makes a single call and either returns a usable result or an
//! [`AdvisorError`]. None of them is required for a package to be produced.

mod domain_analyzer;
mod error;
mod product;
pub mod prompts;
mod refiner;

pub use domain_analyzer::{parse_domain, DomainAnalyzer, LlmDomainAnalyzer, DOMAIN_PHASE};
pub use error::AdvisorError;
pub use product::{
    LlmProductGenerator, ProductBrief, ProductGenerator, ProductPayload, PRODUCT_PHASE,
    REQUIRED_PRODUCT_KEYS,
};
pub use refiner::{IdeaRefiner, LlmIdeaRefiner, REFINE_PHASE};
