//! Deterministic, offline content generation
//!
//! [`TemplateGenerator`] builds the implementation plan, prompt pack and doc pack from
//! structured inputs alone. It never touches the network and has no failure path, which
//! makes it the baseline every generation falls back to.

pub mod blocks;
pub mod docs;
pub mod plan;
pub mod prompts;
pub mod tool_prompts;

use crate::domain::DomainModel;
use crate::features::FeatureFlagSet;
use crate::pipeline::Mode;
use crate::stack::StackChoice;
use crate::tools::ToolProfile;
use std::collections::BTreeMap;

/// Everything procedural generation reads
#[derive(Debug, Clone, Copy)]
pub struct ProceduralInput<'a> {
    pub idea: &'a str,
    pub flags: &'a FeatureFlagSet,
    pub stack: &'a StackChoice,
    pub target_users: Option<&'a str>,
    pub constraints: &'a [String],
    pub industry: Option<&'a str>,
    pub mode: Mode,
    /// Only an accepted domain model; `None` keeps every domain block empty
    pub domain: Option<&'a DomainModel>,
    pub tool: Option<&'a ToolProfile>,
}

impl<'a> ProceduralInput<'a> {
    pub fn new(
        idea: &'a str,
        flags: &'a FeatureFlagSet,
        stack: &'a StackChoice,
        mode: Mode,
    ) -> Self {
        Self {
            idea,
            flags,
            stack,
            target_users: None,
            constraints: &[],
            industry: None,
            mode,
            domain: None,
            tool: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProceduralOutput {
    pub plan: Vec<String>,
    pub prompts: BTreeMap<String, String>,
    pub docs: BTreeMap<String, String>,
}

/// Pure, total generation of the baseline package
pub trait ProceduralGenerator: Send + Sync {
    fn build(&self, input: &ProceduralInput<'_>) -> ProceduralOutput;
}

/// Template-based generator with per-tool variants
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ProceduralGenerator for TemplateGenerator {
    fn build(&self, input: &ProceduralInput<'_>) -> ProceduralOutput {
        ProceduralOutput {
            plan: plan::build_plan(input),
            prompts: prompts::build_prompts(input),
            docs: docs::build_docs(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Endpoint, Entity, Page};
    use crate::features::detect;
    use crate::stack::choose;
    use crate::tools::ToolProfileRegistry;

    fn domain() -> DomainModel {
        DomainModel {
            app_name: Some("pantry".into()),
            entities: vec![
                Entity::new("Zucchini", vec!["weight".into()]),
                Entity::new("Larder", vec!["location".into()]),
            ],
            endpoints: vec![Endpoint {
                method: "GET".into(),
                path: "/api/zucchinis".into(),
                description: "List zucchinis".into(),
                auth: "authenticated".into(),
            }],
            pages: vec![Page {
                name: "Larder Board".into(),
                path: "/larder".into(),
                description: String::new(),
            }],
            workflows: vec![],
        }
    }

    fn all_text(output: &ProceduralOutput) -> String {
        let mut text = output.plan.join("\n");
        for body in output.prompts.values().chain(output.docs.values()) {
            text.push_str(body);
        }
        text
    }

    #[test]
    fn test_domain_names_only_with_domain() {
        let flags = detect("A pantry tracker with search");
        let stack = choose(&flags);
        let registry = ToolProfileRegistry::with_defaults();
        let d = domain();

        for tool in [None, Some("lovable"), Some("replit"), Some("base44"), Some("claude_code")] {
            let profile = registry.resolve(tool);
            for mode in [Mode::Mvp, Mode::Production] {
                let mut input = ProceduralInput::new("A pantry tracker", &flags, &stack, mode);
                input.tool = profile.as_deref();

                let without = all_text(&TemplateGenerator.build(&input));
                assert!(!without.contains("Zucchini"), "{:?} {} leaked", tool, mode);
                assert!(!without.contains("Larder"), "{:?} {} leaked", tool, mode);

                input.domain = Some(&d);
                let with = all_text(&TemplateGenerator.build(&input));
                assert!(with.contains("Zucchini"), "{:?} {} missing entities", tool, mode);
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let flags = detect("A real-time marketplace with payments and AI recommendations");
        let stack = choose(&flags);
        let constraints = vec!["GDPR".to_string()];
        let mut input = ProceduralInput::new("A marketplace", &flags, &stack, Mode::Production);
        input.constraints = &constraints;
        input.target_users = Some("Makers");

        assert_eq!(TemplateGenerator.build(&input), TemplateGenerator.build(&input));
    }

    #[test]
    fn test_output_never_empty() {
        let flags = FeatureFlagSet::new();
        let stack = choose(&flags);
        for mode in [Mode::Mvp, Mode::Production] {
            let output = TemplateGenerator::new().build(&ProceduralInput::new("x", &flags, &stack, mode));
            assert!(!output.plan.is_empty());
            assert!(output.prompts.contains_key("master_prompt"));
            assert!(output.docs.contains_key("readme"));
        }
    }
}
