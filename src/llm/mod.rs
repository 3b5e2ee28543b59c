//! LLM client abstraction layer
//!
//! This module provides a trait-based abstraction for LLM communication,
//! allowing different backends (GenAI, Mock, Offline) to be used interchangeably.

mod client;
mod error;
mod genai;
pub mod json;
mod mock;
mod offline;
mod selector;
mod types;

pub use client::{Completion, LLMClient};
pub use error::BackendError;
pub use genai::GenAIClient;
pub use json::{extract_json_object, JsonExtractError};
pub use mock::{MockLLMClient, MockResponse};
pub use offline::OfflineClient;
pub use selector::{select_llm_client, SelectedClient};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
