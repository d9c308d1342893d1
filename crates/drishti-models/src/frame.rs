//! Sampled frames and per-frame analysis results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// One decoded frame extracted from a video source.
///
/// `index` is zero-based and contiguous in extraction order; downstream
/// stages never need to know the sampling stride. `source_position` is the
/// frame offset within the source and is stable across reruns with the same
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Zero-based, contiguous extraction index
    pub index: u32,
    /// Frame offset within the video source
    pub source_position: u64,
    /// Path to the persisted decoded image
    pub content_ref: PathBuf,
}

impl Frame {
    /// Create a new frame record.
    pub fn new(index: u32, source_position: u64, content_ref: impl Into<PathBuf>) -> Self {
        Self {
            index,
            source_position,
            content_ref: content_ref.into(),
        }
    }
}

/// Outcome of dispatching one frame to the detection capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// The capability produced a usable analysis
    #[default]
    Success,
    /// The capability call failed; `error_detail` carries the reason
    Error,
}

impl AnalysisStatus {
    /// Returns the status as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Returns true if the frame's analysis completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Approximate location of a finding within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPoint {
    pub x: u32,
    pub y: u32,
}

/// Analysis outcome for a single sampled frame.
///
/// Exactly one result exists per sampled frame, in one-to-one index
/// correspondence with [`Frame::index`]. A failed capability call is
/// recorded here with `status = Error` rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysisResult {
    /// Index of the frame this result belongs to
    pub frame_index: u32,
    /// Whether the detection call succeeded
    pub status: AnalysisStatus,
    /// Whether the capability flagged a safety anomaly (always false on error)
    pub anomaly_detected: bool,
    /// Severity of the finding (Low when absent or on error)
    #[serde(default)]
    pub severity: Severity,
    /// Free-text description of the scene or finding
    #[serde(default)]
    pub description: String,
    /// Specific safety concerns identified in this frame
    #[serde(default)]
    pub safety_concerns: Vec<String>,
    /// Immediate actions recommended for this frame
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    /// Failure reason when `status = Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Approximate location of the finding within the frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerPoint>,
}

impl FrameAnalysisResult {
    /// Create a result with no anomaly for a successfully analyzed frame.
    pub fn clear(frame_index: u32, description: impl Into<String>) -> Self {
        Self {
            frame_index,
            status: AnalysisStatus::Success,
            anomaly_detected: false,
            severity: Severity::Low,
            description: description.into(),
            safety_concerns: Vec::new(),
            recommended_actions: Vec::new(),
            error_detail: None,
            marker: None,
        }
    }

    /// Create an error result for a frame whose detection call failed.
    pub fn failed(frame_index: u32, error_detail: impl Into<String>) -> Self {
        Self {
            frame_index,
            status: AnalysisStatus::Error,
            anomaly_detected: false,
            severity: Severity::Low,
            description: String::new(),
            safety_concerns: Vec::new(),
            recommended_actions: Vec::new(),
            error_detail: Some(error_detail.into()),
            marker: None,
        }
    }

    /// Returns true if this result should be counted as an anomaly.
    pub fn is_anomaly(&self) -> bool {
        self.status.is_success() && self.anomaly_detected
    }
}
