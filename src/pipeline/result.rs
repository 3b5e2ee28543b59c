use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rough size estimate derived from the number of detected features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    #[serde(rename = "MVP")]
    Mvp,
    Medium,
    Complex,
}

impl Complexity {
    pub fn from_flag_count(count: usize) -> Self {
        match count {
            0..=2 => Complexity::Mvp,
            3..=5 => Complexity::Medium,
            _ => Complexity::Complex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Mvp => "MVP",
            Complexity::Medium => "Medium",
            Complexity::Complex => "Complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The finished generation package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub refined_idea: String,
    pub implementation_plan: Vec<String>,
    pub tech_stack: BTreeMap<String, String>,
    pub prompts: BTreeMap<String, String>,
    pub docs: BTreeMap<String, String>,
    pub detected_features: Vec<String>,
    pub estimated_complexity: Complexity,
    pub prompt_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        none = { 0, Complexity::Mvp },
        one = { 1, Complexity::Mvp },
        two = { 2, Complexity::Mvp },
        three = { 3, Complexity::Medium },
        five = { 5, Complexity::Medium },
        six = { 6, Complexity::Complex },
        many = { 15, Complexity::Complex },
    )]
    fn test_complexity_from_flag_count(count: usize, expected: Complexity) {
        assert_eq!(Complexity::from_flag_count(count), expected);
    }

    #[test]
    fn test_complexity_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Complexity::Mvp).unwrap(), "\"MVP\"");
        assert_eq!(
            serde_json::to_string(&Complexity::Complex).unwrap(),
            "\"Complex\""
        );
        assert_eq!(Complexity::Medium.to_string(), "Medium");
    }
}
