use thiserror::Error;

/// Why a request was rejected before any generation work started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Idea is too short: {len} characters, at least {min} required")]
    TooShort { len: usize, min: usize },

    #[error("Idea is too long: {len} characters, at most {max} allowed")]
    TooLong { len: usize, max: usize },
}

/// Errors surfaced by [`crate::pipeline::GenerationPipeline::generate`]
///
/// Collaborator failures never appear here; they degrade to procedural output.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = PipelineError::from(ValidationError::TooShort { len: 5, min: 10 });
        assert_eq!(
            err.to_string(),
            "Invalid request: Idea is too short: 5 characters, at least 10 required"
        );
    }
}
