use crate::llm::{BackendError, JsonExtractError};
use thiserror::Error;

/// Why an advisory call produced no usable result
///
/// Every variant is recoverable: the pipeline logs it and falls back.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("LLM unavailable: {0}")]
    Unavailable(#[from] BackendError),

    #[error("Timed out after {seconds:.1}s")]
    Timeout { seconds: f64 },

    #[error("Response was not JSON: {0}")]
    Malformed(#[from] JsonExtractError),

    #[error("Response JSON has the wrong shape: {0}")]
    SchemaMismatch(String),

    #[error("Response too short: {len} characters, more than {min} required")]
    TooShort { len: usize, min: usize },
}

impl AdvisorError {
    pub fn timeout(elapsed: std::time::Duration) -> Self {
        Self::Timeout {
            seconds: elapsed.as_secs_f64(),
        }
    }

    /// Stable label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            AdvisorError::Unavailable(_) => "unavailable",
            AdvisorError::Timeout { .. } => "timeout",
            AdvisorError::Malformed(_) => "malformed",
            AdvisorError::SchemaMismatch(_) => "schema_mismatch",
            AdvisorError::TooShort { .. } => "too_short",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            AdvisorError::from(BackendError::unavailable("down")),
            AdvisorError::timeout(Duration::from_secs(45)),
            AdvisorError::from(JsonExtractError::NoJsonFound),
            AdvisorError::SchemaMismatch("missing api_endpoints".to_string()),
            AdvisorError::TooShort { len: 4, min: 30 },
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(
            AdvisorError::timeout(Duration::from_millis(1500)).to_string(),
            "Timed out after 1.5s"
        );
    }
}
