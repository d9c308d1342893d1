//! Shared data models for the Drishti incident-analysis pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Sampled video frames and per-frame analysis results
//! - Severity levels and the summary-level risk classification
//! - The aggregated incident summary

pub mod frame;
pub mod severity;
pub mod summary;

// Re-export common types
pub use frame::{AnalysisStatus, Frame, FrameAnalysisResult, MarkerPoint};
pub use severity::{RiskLevel, Severity, SeverityBreakdown};
pub use summary::IncidentSummary;
