//! Structured run logging.
//!
//! Consistent lifecycle logging for pipeline runs: every message carries
//! the run ID and the active stage.

use tracing::{info, warn};

/// Run logger with consistent structured fields.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    stage: String,
}

impl RunLogger {
    /// Create a logger for one pipeline stage.
    pub fn new(run_id: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            stage: stage.into(),
        }
    }

    /// Derive a logger for a different stage of the same run.
    pub fn stage(&self, stage: impl Into<String>) -> Self {
        Self {
            run_id: self.run_id.clone(),
            stage: stage.into(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(run_id = %self.run_id, stage = %self.stage, "Stage started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(run_id = %self.run_id, stage = %self.stage, "Stage progress: {}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(run_id = %self.run_id, stage = %self.stage, "Stage warning: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(run_id = %self.run_id, stage = %self.stage, "Stage completed: {}", message);
    }

    /// Get the run ID.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}
