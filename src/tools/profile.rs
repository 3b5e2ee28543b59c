use crate::stack::StackChoice;
use serde::Serialize;

crate::define_flag_enum! {
    /// Code-generation tool a package can be tailored for
    ToolKind {
        Lovable => "lovable",
        Replit => "replit",
        Base44 => "base44",
        ClaudeCode => "claude_code",
    }
}

crate::define_flag_enum! {
    /// How prompts for a tool are phrased
    PromptStyle {
        Descriptive => "descriptive",
        Conversational => "conversational",
        EntityFocused => "entity_focused",
        DetailedCode => "detailed_code",
    }
}

/// Preset stack and generation behaviour for one tool
///
/// Profiles in the registry are shared between requests; use [`ToolProfile::with_stack`]
/// on an owned copy when a dynamically chosen stack has to be attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolProfile {
    pub kind: ToolKind,
    pub name: String,
    pub description: String,
    /// `None` means the stack is chosen from detected flags at request time
    pub stack: Option<StackChoice>,
    pub prompt_style: PromptStyle,
    pub has_own_deployment: bool,
    pub has_own_auth: bool,
}

impl ToolProfile {
    pub fn identifier(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn has_fixed_stack(&self) -> bool {
        self.stack.is_some()
    }

    /// Returns a copy of this profile carrying `stack`
    pub fn with_stack(&self, stack: StackChoice) -> Self {
        Self {
            stack: Some(stack),
            ..self.clone()
        }
    }
}
