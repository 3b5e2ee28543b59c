//! Structured domain model extracted from an idea
//!
//! A model is either accepted whole or not at all: [`DomainModel::from_value`] rejects
//! objects that lack `entities` or `api_endpoints`, or whose entries do not deserialize.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keys that must be present for a domain response to be considered at all
pub const REQUIRED_DOMAIN_KEYS: &[&str] = &["entities", "api_endpoints"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    pub entities: Vec<Entity>,
    #[serde(rename = "api_endpoints")]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub workflows: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            table_name: None,
            description: String::new(),
            fields,
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Storage table name, defaulting to the lower-cased name with an `s` suffix
    pub fn table_name(&self) -> String {
        match &self.table_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{}s", self.name.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_auth")]
    pub auth: String,
}

fn default_auth() -> String {
    "authenticated".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub description: String,
}

/// Why a structured domain response was refused
#[derive(Debug, Error)]
pub enum DomainShapeError {
    #[error("domain response is missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),

    #[error("domain response has malformed entries: {0}")]
    InvalidEntries(#[source] serde_json::Error),
}

impl DomainModel {
    /// Accepts a parsed JSON object as a domain model, all or nothing
    pub fn from_value(value: serde_json::Value) -> Result<Self, DomainShapeError> {
        let missing: Vec<&'static str> = REQUIRED_DOMAIN_KEYS
            .iter()
            .copied()
            .filter(|key| value.get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DomainShapeError::MissingKeys(missing));
        }

        serde_json::from_value(value).map_err(DomainShapeError::InvalidEntries)
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn page_names(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "app_name": "team_chat",
            "entities": [
                {"name": "Channel", "table_name": "channels", "description": "A room", "fields": ["name", "topic"]},
                {"name": "Message", "fields": ["body", "channel_id"]}
            ],
            "api_endpoints": [
                {"method": "POST", "path": "/api/channels", "description": "Create channel"},
                {"method": "GET", "path": "/api/channels/{id}/messages", "auth": "member"}
            ],
            "pages": [{"name": "Inbox", "path": "/inbox"}],
            "workflows": ["Create a channel, invite members, post a message"]
        })
    }

    #[test]
    fn test_accepts_complete_model() {
        let model = DomainModel::from_value(sample()).unwrap();
        assert_eq!(model.entity_names(), vec!["Channel", "Message"]);
        assert_eq!(model.endpoints.len(), 2);
        assert_eq!(model.page_names(), vec!["Inbox"]);
        assert_eq!(model.workflows.len(), 1);
    }

    #[test]
    fn test_defaults() {
        let model = DomainModel::from_value(sample()).unwrap();
        assert_eq!(model.entities[0].table_name(), "channels");
        assert_eq!(model.entities[1].table_name(), "messages");
        assert_eq!(model.endpoints[0].auth, "authenticated");
        assert_eq!(model.endpoints[1].auth, "member");
    }

    #[test]
    fn test_pages_and_workflows_optional() {
        let model = DomainModel::from_value(json!({
            "entities": [{"name": "Task"}],
            "api_endpoints": []
        }))
        .unwrap();
        assert!(model.pages.is_empty());
        assert!(model.workflows.is_empty());
    }

    #[test]
    fn test_rejects_missing_endpoints() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("api_endpoints");

        match DomainModel::from_value(value) {
            Err(DomainShapeError::MissingKeys(keys)) => assert_eq!(keys, vec!["api_endpoints"]),
            other => panic!("expected MissingKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_entity() {
        let value = json!({
            "entities": [{"description": "no name"}],
            "api_endpoints": []
        });
        assert!(matches!(
            DomainModel::from_value(value),
            Err(DomainShapeError::InvalidEntries(_))
        ));
    }

    #[test]
    fn test_rejects_non_list_entities() {
        let value = json!({"entities": "Task, Project", "api_endpoints": []});
        assert!(DomainModel::from_value(value).is_err());
    }
}
