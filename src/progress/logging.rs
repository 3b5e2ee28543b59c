//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage } => {
                debug!(stage = %stage, "Starting stage");
            }
            ProgressEvent::StageComplete { stage, duration } => {
                info!(
                    stage = %stage,
                    duration_ms = duration.as_millis() as u64,
                    "Stage complete"
                );
            }
            ProgressEvent::BranchDegraded {
                branch,
                kind,
                reason,
            } => {
                warn!(branch, kind, reason = %reason, "Advisory branch degraded, using procedural output");
            }
            ProgressEvent::Completed {
                total_time,
                prompt_count,
                plan_from_ai,
            } => {
                info!(
                    prompts = prompt_count,
                    plan_from_ai,
                    total_time_ms = total_time.as_millis() as u64,
                    "Generation complete"
                );
            }
            ProgressEvent::Rejected { reason } => {
                warn!(reason = %reason, "Request rejected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::StageStarted {
                stage: Stage::Validating,
            },
            ProgressEvent::StageComplete {
                stage: Stage::Analyzing,
                duration: Duration::from_millis(120),
            },
            ProgressEvent::BranchDegraded {
                branch: "product",
                kind: "malformed",
                reason: "no JSON object found".to_string(),
            },
            ProgressEvent::Completed {
                total_time: Duration::from_secs(3),
                prompt_count: 4,
                plan_from_ai: true,
            },
            ProgressEvent::Rejected {
                reason: "Idea is too short".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
