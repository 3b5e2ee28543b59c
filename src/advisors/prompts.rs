//! System and user prompts for the advisory LLM calls

use super::product::ProductBrief;
use crate::features::FeatureFlagSet;
use crate::pipeline::Mode;
use crate::stack::StackChoice;

const REFINE_SYSTEM: &str = "You are a senior product consultant. The user will give you a rough product idea. \
Your job is to REFINE it into a clear, structured description that a developer can act on. \
Return ONLY the refined description as plain text (no JSON, no markdown headings). \
Include:\n\
1. A one-sentence summary of what the product does.\n\
2. The core problem it solves and for whom.\n\
3. The 3-5 key features that make up the MVP.\n\
4. The main user workflows (step by step).\n\
5. What makes it different or valuable.\n\
Keep it concise: 150-300 words. Do NOT add features the user didn't mention or imply.";

const REFINE_SYSTEM_MVP: &str = "You are a product consultant. The user will give you a rough product idea. \
Refine it into a clear, concise description a developer can build from. \
Return ONLY plain text (no JSON, no markdown). \
Include: one-sentence summary, core problem, 2-3 key MVP features, main user flow. \
Keep it under 100 words. Do NOT add features the user didn't mention.";

const DOMAIN_SYSTEM: &str = r#"You are a senior software architect. Analyze the product idea and extract its concrete domain model so developers can build it.
Return ONLY valid JSON (no markdown fences, no commentary) with these exact keys:
{
  "app_name": "short_project_name_in_snake_case",
  "entities": [
    {"name": "EntityName", "table_name": "entity_names", "description": "What this entity represents", "fields": ["field1", "field2", "field3"]}
  ],
  "api_endpoints": [
    {"method": "POST", "path": "/api/resource", "description": "What this endpoint does", "auth": "authenticated"}
  ],
  "pages": [
    {"name": "Page Name", "path": "/dashboard/page", "description": "What the user sees and does on this page"}
  ],
  "workflows": [
    "Step-by-step description of a key user workflow"
  ]
}

Rules:
- Include 3-8 entities with 4-8 fields each (domain-specific, not just id/timestamps)
- Include 10-20 API endpoints covering CRUD + domain-specific actions
- Include 5-10 frontend pages the app needs
- Include 3-5 key user workflows as step-by-step descriptions
- Be SPECIFIC to THIS idea, use actual domain terminology
- Do NOT include generic auth endpoints (register/login), those are handled separately
- Entity fields should be domain-meaningful (e.g., 'priority', 'due_date', 'assignee_id'), not boilerplate (id, created_at are added automatically)"#;

const DOMAIN_SYSTEM_MVP: &str = r#"You are a software architect. Analyze the product idea and extract its core domain model for an MVP build.
Return ONLY valid JSON (no markdown fences) with these keys:
{
  "app_name": "short_name",
  "entities": [{"name": "...", "table_name": "...", "description": "...", "fields": ["..."]}],
  "api_endpoints": [{"method": "...", "path": "...", "description": "...", "auth": "..."}],
  "pages": [{"name": "...", "path": "...", "description": "..."}],
  "workflows": ["..."]
}
Keep it lean: 2-4 entities, 6-10 endpoints, 3-5 pages, 2-3 workflows.
Focus on the CORE feature only. Be specific to THIS idea."#;

const PRODUCT_SYSTEM_MVP: &str = "You are a senior engineer helping plan an MVP. \
Return ONLY valid JSON (no markdown fences) with these keys:\n\
  \"implementation_plan\": array of 6-8 short steps to build an MVP fast,\n\
  \"tech_stack\": object of technology choices,\n\
  \"prompts\": {\"product_requirements\": \"a concise 800-1200 char product brief\"},\n\
  \"docs\": {\"readme\": \"a short 500 char project readme\"}.\n\
Focus on speed to market, not perfection. Keep everything lean.";

const LEAN_BUDGET_WORDS: &[&str] = &["small", "low", "minimal", "bootstrap", "< 5k", "<5k"];
const LARGE_BUDGET_WORDS: &[&str] = &["large", "high", "enterprise", "> 50k", ">50k"];

pub fn refine_system(mode: Mode) -> &'static str {
    match mode {
        Mode::Mvp => REFINE_SYSTEM_MVP,
        Mode::Production => REFINE_SYSTEM,
    }
}

fn with_target_users(mut message: String, target_users: Option<&str>) -> String {
    if let Some(users) = target_users.filter(|u| !u.trim().is_empty()) {
        message.push_str("\nTarget users: ");
        message.push_str(users);
    }
    message
}

pub fn refine_user(idea: &str, target_users: Option<&str>) -> String {
    with_target_users(format!("Idea: {}", idea), target_users)
}

pub fn domain_system(mode: Mode) -> &'static str {
    match mode {
        Mode::Mvp => DOMAIN_SYSTEM_MVP,
        Mode::Production => DOMAIN_SYSTEM,
    }
}

pub fn domain_user(refined_idea: &str, target_users: Option<&str>) -> String {
    with_target_users(format!("Product idea: {}", refined_idea), target_users)
}

fn flag_lines(flags: &FeatureFlagSet, bullet: impl Fn(&str, &str) -> String) -> String {
    flags
        .sorted()
        .iter()
        .map(|flag| bullet(flag.as_str(), flag.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn product_system(flags: &FeatureFlagSet, stack: &StackChoice, mode: Mode) -> String {
    if mode.is_mvp() {
        return PRODUCT_SYSTEM_MVP.to_string();
    }

    let stack_lines = stack
        .summary_lines()
        .iter()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    let feature_section = if flags.is_empty() {
        String::new()
    } else {
        format!(
            "\nThe following feature capabilities were detected in the idea:\n{}\n\
             Incorporate ALL of these into your response. Do not ignore any detected feature.\n",
            flag_lines(flags, |name, desc| format!("  - {}: {}", name, desc))
        )
    };

    format!(
        r#"You are a principal full-stack engineer and system architect with 15+ years of
experience shipping production SaaS applications. You have deep expertise in
product strategy, system design, database modelling, API design, security,
DevOps, and frontend architecture.

Your task is to analyse a product idea and produce a DEEPLY DETAILED implementation
package as valid JSON. Your output will be used by a development team to build
the application from scratch.

## Chosen Tech Stack
{stack_lines}
{feature_section}
## Output Format (STRICT JSON)

Return ONLY valid JSON (no markdown fences, no commentary) with these exact keys:

{{
  "implementation_plan": [ 15-25 granular, actionable steps organised in phases:
    Foundation, Backend, Frontend, Features, Launch. Reference specific technologies. ],
  "tech_stack": {{ object mirroring the stack above, keys: frontend, frontend_ui, backend,
    database, cache, infra, auth, ai, search, file_storage, email, monitoring, testing }},
  "prompts": {{ "product_requirements": "a 2000+ character Product Requirements Document with
    problem statement, 3+ personas, 15+ user stories (Given/When/Then), P0/P1/P2
    prioritisation, acceptance criteria, NFRs, success metrics, risks, out-of-scope items" }},
  "docs": {{ "readme": "a 1500+ character project README" }}
}}

## Quality Gates
- The product_requirements prompt MUST be at least 2000 characters.
- The readme doc MUST be at least 1500 characters.
- Every implementation step MUST reference a specific technology or tool.
- Do NOT use vague phrases like "implement as needed" or "add relevant features".
- Do NOT include any text outside the JSON object.
"#
    )
}

fn scope_guidance(budget: &str) -> Option<&'static str> {
    let lowered = budget.to_lowercase();
    if LEAN_BUDGET_WORDS.iter().any(|w| lowered.contains(w)) {
        Some(
            "## Scope Guidance\nBudget is limited, focus on a lean MVP. \
             Minimise paid services, prefer open-source alternatives, and defer non-essential features.",
        )
    } else if LARGE_BUDGET_WORDS.iter().any(|w| lowered.contains(w)) {
        Some(
            "## Scope Guidance\nBudget is substantial, plan for production-grade infrastructure, \
             comprehensive monitoring, and polished UX from day one.",
        )
    } else {
        None
    }
}

pub fn product_user(brief: &ProductBrief) -> String {
    let mut sections: Vec<String> = Vec::new();

    if brief.mode.is_mvp() {
        sections.push(format!("## Idea\n{}", brief.idea));
        if let Some(users) = &brief.target_users {
            sections.push(format!("## Target Users\n{}", users));
        }
        if let Some(budget) = &brief.budget {
            sections.push(format!("## Budget\n{}", budget));
        }
        sections.push(
            "## Goal\nProduce a lean MVP plan. Prioritise the single most important \
             workflow. Skip advanced features, monitoring, and security hardening."
                .to_string(),
        );
        return sections.join("\n\n");
    }

    sections.push(format!("## Product Idea\n{}", brief.idea));
    if let Some(users) = &brief.target_users {
        sections.push(format!("## Target Users\n{}", users));
    }
    if let Some(budget) = &brief.budget {
        sections.push(format!("## Budget\n{}", budget));
    }
    if let Some(timeline) = &brief.timeline {
        sections.push(format!("## Timeline\n{}", timeline));
    }
    if !brief.constraints.is_empty() {
        let items = brief
            .constraints
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("## Constraints\n{}", items));
    }
    if let Some(industry) = &brief.industry {
        sections.push(format!(
            "## Industry\n{}\nConsider relevant compliance requirements (HIPAA, PCI-DSS, GDPR, SOC 2, etc.).",
            industry
        ));
    }
    if let Some(preferred) = &brief.preferred_stack {
        sections.push(format!(
            "## User's Stack Preferences\n{}\nIncorporate these preferences where they don't conflict with detected requirements.",
            preferred
        ));
    }
    if !brief.flags.is_empty() {
        sections.push(format!(
            "## Detected Features\n{}",
            flag_lines(&brief.flags, |name, desc| format!("- **{}**: {}", name, desc))
        ));
    }
    sections.push(format!(
        "## Selected Tech Stack\n{}",
        brief.stack.summary_lines().join("\n")
    ));
    if let Some(guidance) = brief.budget.as_deref().and_then(scope_guidance) {
        sections.push(guidance.to_string());
    }
    sections.push(
        "## Expected Deliverables\n\
         Return a JSON object with keys: implementation_plan, tech_stack, prompts, docs.\n\
         - implementation_plan: 15-25 granular steps in phases\n\
         - tech_stack: full technology choices\n\
         - prompts.product_requirements: 2000+ character PRD\n\
         - docs.readme: 1500+ character project README"
            .to_string(),
    );

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{detect, FeatureFlag};
    use crate::stack::choose;

    fn brief(mode: Mode) -> ProductBrief {
        let flags = detect("real-time chat with stripe payments");
        let stack = choose(&flags);
        ProductBrief {
            idea: "Team chat with paid workspaces".to_string(),
            mode,
            flags,
            stack,
            target_users: Some("remote teams".to_string()),
            budget: Some("Small bootstrap budget".to_string()),
            timeline: Some("6 weeks".to_string()),
            constraints: vec!["GDPR".to_string()],
            industry: Some("SaaS".to_string()),
            preferred_stack: None,
        }
    }

    #[test]
    fn test_refine_prompts() {
        assert!(refine_system(Mode::Mvp).contains("under 100 words"));
        assert!(refine_system(Mode::Production).contains("150-300 words"));
        assert_eq!(refine_user("An idea", None), "Idea: An idea");
        assert_eq!(
            refine_user("An idea", Some("nurses")),
            "Idea: An idea\nTarget users: nurses"
        );
    }

    #[test]
    fn test_domain_prompts() {
        assert!(domain_system(Mode::Mvp).contains("Keep it lean"));
        assert!(domain_system(Mode::Production).contains("api_endpoints"));
        assert_eq!(domain_user("Refined", Some("  ")), "Product idea: Refined");
    }

    #[test]
    fn test_product_system_lists_detected_features() {
        let b = brief(Mode::Production);
        let system = product_system(&b.flags, &b.stack, Mode::Production);

        assert!(system.contains(&format!(
            "  - realtime: {}",
            FeatureFlag::Realtime.description()
        )));
        assert!(system.contains("  - Frontend: "));
        assert!(!system.contains(": None"));
    }

    #[test]
    fn test_product_system_mvp_is_lean() {
        let b = brief(Mode::Mvp);
        assert_eq!(
            product_system(&b.flags, &b.stack, Mode::Mvp),
            PRODUCT_SYSTEM_MVP
        );
    }

    #[test]
    fn test_product_user_production_sections() {
        let user = product_user(&brief(Mode::Production));

        assert!(user.starts_with("## Product Idea\nTeam chat with paid workspaces"));
        assert!(user.contains("## Timeline\n6 weeks"));
        assert!(user.contains("## Constraints\n- GDPR"));
        assert!(user.contains("HIPAA, PCI-DSS"));
        assert!(user.contains("- **payments**: "));
        assert!(user.contains("Budget is limited"));
        assert!(!user.contains("User's Stack Preferences"));
    }

    #[test]
    fn test_product_user_mvp_sections() {
        let user = product_user(&brief(Mode::Mvp));

        assert!(user.starts_with("## Idea\n"));
        assert!(user.contains("## Goal\n"));
        assert!(!user.contains("## Timeline"));
    }

    #[test]
    fn test_scope_guidance() {
        assert!(scope_guidance("Enterprise").unwrap().contains("substantial"));
        assert!(scope_guidance("<5k").unwrap().contains("limited"));
        assert!(scope_guidance("moderate").is_none());
    }
}
