//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum frames to sample per video
    pub max_frames: u32,
    /// Maximum concurrent detection calls (1 = strictly sequential)
    pub dispatch_concurrency: usize,
    /// Minimum delay between consecutive detection calls
    pub inter_call_delay: Duration,
    /// Work directory for run-scoped frames and artifacts
    pub work_dir: PathBuf,
    /// Report destination; defaults to `<run dir>/report.txt` when unset
    pub report_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_frames: 5,
            dispatch_concurrency: 1,
            inter_call_delay: Duration::from_millis(100),
            work_dir: PathBuf::from("/tmp/drishti"),
            report_path: None,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_frames: std::env::var("PIPELINE_MAX_FRAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(5),
            dispatch_concurrency: std::env::var("PIPELINE_DISPATCH_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(1),
            inter_call_delay: Duration::from_millis(
                std::env::var("PIPELINE_INTER_CALL_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(100),
            ),
            work_dir: std::env::var("PIPELINE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/drishti")),
            report_path: std::env::var("PIPELINE_REPORT_PATH").ok().map(PathBuf::from),
        }
    }
}
