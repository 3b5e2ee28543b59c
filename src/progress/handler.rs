//! Progress handler trait and events

use crate::pipeline::Stage;
use std::time::Duration;

/// Events emitted while a request moves through the pipeline
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A stage began
    StageStarted { stage: Stage },

    /// A stage finished
    StageComplete { stage: Stage, duration: Duration },

    /// An advisory branch produced nothing usable and the procedural result stands in
    BranchDegraded {
        branch: &'static str,
        kind: &'static str,
        reason: String,
    },

    /// The package was assembled
    Completed {
        total_time: Duration,
        prompt_count: usize,
        plan_from_ai: bool,
    },

    /// Validation refused the request
    Rejected { reason: String },
}

/// Receives progress events from a running pipeline
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
