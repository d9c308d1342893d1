//! The Drishti incident-analysis pipeline.
//!
//! A single linear traversal per video: sample frames, dispatch each frame
//! to the anomaly-detection capability under rate pacing with per-frame
//! failure isolation, aggregate the results into a severity-scored
//! [`drishti_models::IncidentSummary`], and render a paginated report.

pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use aggregate::aggregate;
pub use config::PipelineConfig;
pub use dispatch::{DispatchOptions, FrameDispatcher};
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use pipeline::{AnalysisOutcome, PipelineOutput, VideoPipeline};
