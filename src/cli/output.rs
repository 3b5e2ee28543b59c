//! Output formatting for JSON, YAML and human-readable text

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::IdeaforgeConfig;
use crate::features::FeatureFlagSet;
use crate::pipeline::{Complexity, GenerationResult};
use crate::stack::{title_case, StackChoice};
use crate::tools::ToolProfile;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// What `ideaforge features` reports for a text
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub detected_features: Vec<String>,
    pub descriptions: BTreeMap<String, String>,
    pub estimated_complexity: Complexity,
    pub tech_stack: BTreeMap<String, String>,
}

impl FeatureReport {
    pub fn new(flags: &FeatureFlagSet, stack: &StackChoice) -> Self {
        Self {
            detected_features: flags.sorted_names(),
            descriptions: flags
                .sorted()
                .into_iter()
                .map(|f| (f.as_str().to_string(), f.description().to_string()))
                .collect(),
            estimated_complexity: Complexity::from_flag_count(flags.len()),
            tech_stack: stack.to_map(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_result(&self, result: &GenerationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(result, "generation result"),
            OutputFormat::Yaml => to_yaml(result, "generation result"),
            OutputFormat::Human => Ok(self.format_result_human(result)),
        }
    }

    pub fn format_features(&self, report: &FeatureReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report, "feature report"),
            OutputFormat::Yaml => to_yaml(report, "feature report"),
            OutputFormat::Human => Ok(self.format_features_human(report)),
        }
    }

    pub fn format_tools(&self, tools: &[Arc<ToolProfile>]) -> Result<String> {
        let profiles: Vec<&ToolProfile> = tools.iter().map(|t| t.as_ref()).collect();
        match self.format {
            OutputFormat::Json => to_json(&profiles, "tool profiles"),
            OutputFormat::Yaml => to_yaml(&profiles, "tool profiles"),
            OutputFormat::Human => Ok(self.format_tools_human(&profiles)),
        }
    }

    pub fn format_config(&self, config: &IdeaforgeConfig) -> Result<String> {
        let config_map = config.to_display_map();
        match self.format {
            OutputFormat::Json => to_json(&config_map, "config"),
            OutputFormat::Yaml => to_yaml(&config_map, "config"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_result_human(&self, result: &GenerationResult) -> String {
        let mut output = String::new();

        output.push_str("\u{2713} Implementation Package\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str("Refined Idea:\n");
        output.push_str(&result.refined_idea);
        output.push_str("\n\n");

        output.push_str(&format!(
            "Complexity:  {}\n",
            result.estimated_complexity
        ));
        if result.detected_features.is_empty() {
            output.push_str("Features:    (none detected)\n\n");
        } else {
            output.push_str(&format!(
                "Features:    {}\n\n",
                result.detected_features.join(", ")
            ));
        }

        output.push_str("Tech Stack:\n");
        push_tree(
            &mut output,
            result
                .tech_stack
                .iter()
                .map(|(slot, tech)| format!("{:<13} {}", title_case(slot), tech)),
        );
        output.push('\n');

        output.push_str(&format!(
            "Implementation Plan ({} steps):\n",
            result.implementation_plan.len()
        ));
        for (i, step) in result.implementation_plan.iter().enumerate() {
            output.push_str(&format!("{:>3}. {}\n", i + 1, step));
        }
        output.push('\n');

        output.push_str(&format!("Prompts ({}):\n", result.prompt_count));
        push_tree(
            &mut output,
            result
                .prompts
                .iter()
                .map(|(name, body)| format!("{} ({} chars)", name, body.chars().count())),
        );
        output.push('\n');

        output.push_str(&format!("Docs ({}):\n", result.docs.len()));
        push_tree(&mut output, result.docs.keys().cloned());

        output.push_str("\nUse --format json or --format yaml for full prompt and doc contents\n");
        output
    }

    fn format_features_human(&self, report: &FeatureReport) -> String {
        let mut output = String::new();

        output.push_str("Feature Detection\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        if report.descriptions.is_empty() {
            output.push_str("No advanced features detected, standard CRUD application.\n\n");
        } else {
            for (name, description) in &report.descriptions {
                output.push_str(&format!("\u{2022} {}\n    {}\n", name, description));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "Complexity: {}\n\n",
            report.estimated_complexity
        ));

        output.push_str("Stack:\n");
        push_tree(
            &mut output,
            report
                .tech_stack
                .iter()
                .map(|(slot, tech)| format!("{:<13} {}", title_case(slot), tech)),
        );
        output
    }

    fn format_tools_human(&self, tools: &[&ToolProfile]) -> String {
        let mut output = String::new();

        output.push_str("Tool Profiles\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        for tool in tools {
            output.push_str(&format!("{} ({})\n", tool.name, tool.identifier()));
            output.push_str(&format!("  {}\n", tool.description));
            output.push_str(&format!(
                "  Stack: {}\n",
                if tool.has_fixed_stack() {
                    "fixed"
                } else {
                    "chosen from detected features"
                }
            ));
            output.push_str(&format!("  Prompt style: {}\n", tool.prompt_style));
            output.push_str(&format!(
                "  Own deployment: {}, own auth: {}\n\n",
                yes_no(tool.has_own_deployment),
                yes_no(tool.has_own_auth)
            ));
        }

        output
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}

fn push_tree(output: &mut String, lines: impl Iterator<Item = String>) {
    let lines: Vec<String> = lines.collect();
    for (i, line) in lines.iter().enumerate() {
        let connector = if i + 1 == lines.len() {
            "\u{2514}"
        } else {
            "\u{251C}"
        };
        output.push_str(&format!("{}\u{2500} {}\n", connector, line));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
