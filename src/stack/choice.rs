use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker value for a slot that has no technology assigned
pub const NONE_SLOT: &str = "None";

/// One technology decision per named slot
///
/// Built once per request and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackChoice {
    pub frontend: String,
    pub frontend_ui: String,
    pub backend: String,
    pub database: String,
    pub cache: String,
    pub infra: String,
    pub auth: String,
    pub ai: String,
    pub search: String,
    pub file_storage: String,
    pub email: String,
    pub monitoring: String,
    pub testing: String,
}

impl StackChoice {
    /// Slots in declaration order, paired with their names
    pub fn slots(&self) -> [(&'static str, &str); 13] {
        [
            ("frontend", &self.frontend),
            ("frontend_ui", &self.frontend_ui),
            ("backend", &self.backend),
            ("database", &self.database),
            ("cache", &self.cache),
            ("infra", &self.infra),
            ("auth", &self.auth),
            ("ai", &self.ai),
            ("search", &self.search),
            ("file_storage", &self.file_storage),
            ("email", &self.email),
            ("monitoring", &self.monitoring),
            ("testing", &self.testing),
        ]
    }

    /// Flat slot-name to technology mapping
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.slots()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// `- Slot Name: technology` lines for every assigned slot
    pub fn summary_lines(&self) -> Vec<String> {
        self.slots()
            .into_iter()
            .filter(|(_, v)| *v != NONE_SLOT)
            .map(|(k, v)| format!("- {}: {}", title_case(k), v))
            .collect()
    }

    /// First component of a `"A + B + C"` slot value, e.g. `"PostgreSQL 16"`
    pub fn primary(value: &str) -> &str {
        value.split('+').next().unwrap_or(value).trim()
    }
}

/// `"file_storage"` -> `"File Storage"`
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("file_storage"), "File Storage");
        assert_eq!(title_case("ai"), "Ai");
    }

    #[test]
    fn test_primary_component() {
        assert_eq!(
            StackChoice::primary("PostgreSQL 16 + SQLAlchemy 2.0 (async) + Alembic"),
            "PostgreSQL 16"
        );
        assert_eq!(StackChoice::primary("Clerk (managed auth)"), "Clerk (managed auth)");
    }
}
