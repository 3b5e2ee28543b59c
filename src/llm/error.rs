//! LLM transport errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to an LLM backend
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum BackendError {
    /// API request failed with the given message
    #[error("API error{}: {message}", status_code.map(|c| format!(" ({})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Authentication failed or credentials are invalid
    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    /// Request timed out after the specified duration (in seconds)
    #[error("Request timed out after {seconds} seconds")]
    TimeoutError { seconds: u64 },

    /// Rate limit exceeded
    #[error("Rate limit exceeded{}", retry_after.map(|s| format!(", retry after {} seconds", s)).unwrap_or_default())]
    RateLimitError { retry_after: Option<u64> },

    /// No backend is configured or reachable
    #[error("LLM backend unavailable: {message}")]
    Unavailable { message: String },

    /// Configuration error (missing API keys, invalid settings, etc.)
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Generic error for other cases
    #[error("Error: {message}")]
    Other { message: String },
}

impl BackendError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
