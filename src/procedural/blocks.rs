//! Markdown fragments shared by prompt and doc templates
//!
//! Every domain block renders to an empty string without a domain, so no entity,
//! page or endpoint text can appear unless a model was accepted.

use crate::domain::DomainModel;
use crate::stack::{title_case, StackChoice, NONE_SLOT};

pub const QUALITY_FOOTER: &str = "
## Quality Requirements
- All code must be COMPLETE: no TODOs, no placeholders, no \"implement here\" comments.
- Include proper error handling for every operation that can fail.
- Include input validation for every user-facing input.
- Include proper logging (INFO for business events, ERROR for failures).
- Use type hints (Python) / TypeScript types throughout.
- Follow framework idioms and best practices.

## Output Format
Produce the code as a series of complete files. Precede each file with a comment
showing its path, e.g. `# filepath: backend/app/models/user.py`.
";

pub const MVP_QUALITY: &str = "
## Rules
- Working code only, no placeholders.
- Favour the simplest thing that works; this is an MVP.
- Precede each file with `# filepath: <path>`.
";

pub fn entity_names(domain: Option<&DomainModel>) -> Option<String> {
    domain
        .filter(|d| !d.entities.is_empty())
        .map(|d| d.entity_names().join(", "))
}

pub fn page_names(domain: Option<&DomainModel>) -> Option<String> {
    domain
        .filter(|d| !d.pages.is_empty())
        .map(|d| d.page_names().join(", "))
}

/// `" Label: a, b."` when names exist, empty otherwise
pub fn names_suffix(label: &str, names: Option<&str>) -> String {
    names
        .map(|n| format!(" {}: {}.", label, n))
        .unwrap_or_default()
}

pub fn entities_block(domain: Option<&DomainModel>) -> String {
    let Some(domain) = domain.filter(|d| !d.entities.is_empty()) else {
        return String::new();
    };
    let mut lines = vec!["\n## Domain Entities (build ALL of these)\n".to_string()];
    for entity in &domain.entities {
        lines.push(format!(
            "- **{}** (`{}`): {}  \n  Fields: {}",
            entity.name,
            entity.table_name(),
            entity.description,
            entity.fields.join(", ")
        ));
    }
    lines.join("\n")
}

pub fn endpoints_block(domain: Option<&DomainModel>) -> String {
    let Some(domain) = domain.filter(|d| !d.endpoints.is_empty()) else {
        return String::new();
    };
    let mut lines = vec![
        "\n## API Endpoints (implement ALL of these)\n".to_string(),
        "| Method | Path | Description | Auth |".to_string(),
        "|--------|------|-------------|------|".to_string(),
    ];
    for ep in &domain.endpoints {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            ep.method, ep.path, ep.description, ep.auth
        ));
    }
    lines.join("\n")
}

pub fn pages_block(domain: Option<&DomainModel>) -> String {
    let Some(domain) = domain.filter(|d| !d.pages.is_empty()) else {
        return String::new();
    };
    let mut lines = vec!["\n## Pages to Build (implement ALL of these)\n".to_string()];
    for page in &domain.pages {
        lines.push(format!(
            "- **{}** (`{}`): {}",
            page.name, page.path, page.description
        ));
    }
    lines.join("\n")
}

pub fn workflows_block(domain: Option<&DomainModel>) -> String {
    let Some(domain) = domain.filter(|d| !d.workflows.is_empty()) else {
        return String::new();
    };
    let mut lines = vec!["\n## Key User Workflows\n".to_string()];
    for (i, workflow) in domain.workflows.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, workflow));
    }
    lines.join("\n")
}

/// Bold bullet list of assigned slots, optionally restricted to `keys`
pub fn stack_block(stack: &StackChoice, keys: Option<&[&str]>) -> String {
    stack
        .slots()
        .into_iter()
        .filter(|(k, _)| keys.map_or(true, |keys| keys.contains(k)))
        .filter(|(_, v)| *v != NONE_SLOT)
        .map(|(k, v)| format!("- **{}**: {}", title_case(k), v))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn target_users_section(target_users: Option<&str>) -> String {
    target_users
        .map(|users| format!("\n## Target Users\n{}\n", users))
        .unwrap_or_default()
}

pub fn constraints_section(constraints: &[String]) -> String {
    if constraints.is_empty() {
        return String::new();
    }
    let items = constraints
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n## Constraints\n{}\n", items)
}

/// Hosting target without any parenthesised alternatives
pub fn deploy_target(infra: &str) -> &str {
    infra.split('(').next().unwrap_or(infra).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Endpoint, Entity, Page};

    fn domain() -> DomainModel {
        DomainModel {
            app_name: None,
            entities: vec![Entity::new("Recipe", vec!["title".into(), "servings".into()])],
            endpoints: vec![Endpoint {
                method: "GET".into(),
                path: "/api/recipes".into(),
                description: "List recipes".into(),
                auth: "public".into(),
            }],
            pages: vec![Page {
                name: "Cookbook".into(),
                path: "/cookbook".into(),
                description: String::new(),
            }],
            workflows: vec!["Save a recipe".into()],
        }
    }

    #[test]
    fn test_blocks_empty_without_domain() {
        assert!(entities_block(None).is_empty());
        assert!(endpoints_block(None).is_empty());
        assert!(pages_block(None).is_empty());
        assert!(workflows_block(None).is_empty());
        assert!(entity_names(None).is_none());
        assert_eq!(names_suffix("Models", None), "");
    }

    #[test]
    fn test_blocks_render_domain() {
        let d = domain();
        assert!(entities_block(Some(&d)).contains("- **Recipe** (`recipes`)"));
        assert!(endpoints_block(Some(&d)).contains("| GET | /api/recipes | List recipes | public |"));
        assert!(pages_block(Some(&d)).contains("**Cookbook** (`/cookbook`)"));
        assert!(workflows_block(Some(&d)).contains("1. Save a recipe"));
        assert_eq!(
            names_suffix("Models", entity_names(Some(&d)).as_deref()),
            " Models: Recipe."
        );
    }

    #[test]
    fn test_stack_block_filters() {
        let stack = crate::stack::choose(&crate::features::FeatureFlagSet::new());
        let block = stack_block(&stack, Some(&["database", "cache"]));
        assert!(block.starts_with("- **Database**: PostgreSQL"));
        assert!(!block.contains("Cache"));
    }

    #[test]
    fn test_deploy_target() {
        assert_eq!(deploy_target("Docker + Railway (or Fly.io)"), "Docker + Railway");
        assert_eq!(deploy_target("Vercel"), "Vercel");
    }
}
