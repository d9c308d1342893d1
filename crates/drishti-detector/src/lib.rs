//! External capability clients for the Drishti pipeline.
//!
//! Defines the anomaly-detection and narrative-generation capabilities as
//! traits so the pipeline is testable with deterministic stubs, plus a
//! Gemini-backed implementation of both.

pub mod capability;
pub mod error;
pub mod gemini;
pub mod types;

pub use capability::{AnomalyDetector, NarrativeGenerator};
pub use error::{DetectorError, DetectorResult};
pub use gemini::{GeminiClient, GeminiConfig};
pub use types::{Coordinates, DetectorResponse, FrameAnalysis};
