//! Recovery of a JSON object from free-form model output

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonExtractError {
    #[error("no JSON object found in response")]
    NoJsonFound,

    #[error("invalid JSON: {0}")]
    Invalid(#[source] serde_json::Error),

    #[error("response is JSON but not an object")]
    NotAnObject,
}

fn object_span() -> &'static Regex {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"))
}

/// Parses `text` as a JSON object
///
/// Tries the whole trimmed text first, then the span from the first `{` to the last `}`,
/// which covers markdown fences and chatter around the payload.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, JsonExtractError> {
    let trimmed = text.trim();

    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(strict_err) => {
            let span = object_span()
                .find(trimmed)
                .ok_or(if trimmed.is_empty() || !trimmed.contains('{') {
                    JsonExtractError::NoJsonFound
                } else {
                    JsonExtractError::Invalid(strict_err)
                })?;
            serde_json::from_str::<Value>(span.as_str()).map_err(JsonExtractError::Invalid)?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(JsonExtractError::NotAnObject),
    }
}
