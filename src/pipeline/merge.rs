//! Acceptance rules for AI-sourced content competing with the procedural baseline

use super::config::PipelineConfig;
use super::request::Mode;
use crate::advisors::ProductPayload;
use crate::procedural::ProceduralOutput;

/// Prompt key of the high-level requirements narrative
pub const REQUIREMENTS_PROMPT: &str = "product_requirements";

/// Which parts of the final package came from the product generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub plan_from_ai: bool,
    pub requirements_from_ai: bool,
}

pub fn min_plan_steps(mode: Mode, config: &PipelineConfig) -> usize {
    match mode {
        Mode::Mvp => config.mvp_min_plan_steps,
        Mode::Production => config.production_min_plan_steps,
    }
}

/// Folds `payload` into `baseline`
///
/// Docs are never touched. The requirements prompt is replaced only by a strictly longer
/// version, and the plan only by one with at least the mode's minimum step count.
pub fn merge(
    mut baseline: ProceduralOutput,
    payload: Option<ProductPayload>,
    mode: Mode,
    config: &PipelineConfig,
) -> (ProceduralOutput, MergeReport) {
    let mut report = MergeReport::default();
    let Some(payload) = payload else {
        return (baseline, report);
    };

    if let Some(requirements) = payload.product_requirements {
        let current = baseline
            .prompts
            .get(REQUIREMENTS_PROMPT)
            .map_or(0, |p| p.chars().count());
        if requirements.chars().count() > current {
            baseline
                .prompts
                .insert(REQUIREMENTS_PROMPT.to_string(), requirements);
            report.requirements_from_ai = true;
        }
    }

    if let Some(plan) = payload.implementation_plan {
        if plan.len() >= min_plan_steps(mode, config) {
            baseline.plan = plan;
            report.plan_from_ai = true;
        }
    }

    (baseline, report)
}
