use serde::{Deserialize, Serialize};

crate::define_flag_enum! {
    /// How much scope the generated package covers
    Mode {
        Mvp => "mvp",
        Production => "production",
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Production
    }
}

impl Mode {
    pub fn is_mvp(&self) -> bool {
        matches!(self, Mode::Mvp)
    }
}

/// A product idea plus the optional hints that shape its package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRequest {
    pub idea: String,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_users: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl IdeaRequest {
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            constraints: Vec::new(),
            target_users: None,
            budget: None,
            preferred_stack: None,
            industry: None,
            timeline: None,
            mode: Mode::default(),
            tool: None,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = non_blank(tool);
        self
    }

    pub fn with_target_users(mut self, target_users: impl Into<String>) -> Self {
        self.target_users = non_blank(target_users);
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = non_blank(budget);
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = non_blank(timeline);
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = non_blank(industry);
        self
    }

    pub fn with_preferred_stack(mut self, preferred_stack: impl Into<String>) -> Self {
        self.preferred_stack = non_blank(preferred_stack);
        self
    }

    /// The idea with surrounding whitespace removed
    pub fn trimmed_idea(&self) -> &str {
        self.idea.trim()
    }
}
