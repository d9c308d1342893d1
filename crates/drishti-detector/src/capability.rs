//! Capability traits for external generative services.

use async_trait::async_trait;

use drishti_models::IncidentSummary;

use crate::error::DetectorResult;
use crate::types::DetectorResponse;

/// Per-frame anomaly detection over a still image.
///
/// Implementations must tolerate the upstream model violating its output
/// contract; schema recovery is the caller's job via [`DetectorResponse`].
#[async_trait]
pub trait AnomalyDetector: Send + Sync {
    /// Analyze one frame's image bytes for safety anomalies.
    async fn detect(&self, image: &[u8], mime_type: &str) -> DetectorResult<DetectorResponse>;
}

/// Optional prose narrative over an aggregated summary.
///
/// Failure here must never block producing the summary itself.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Generate an incident-report narrative from aggregate counts and lists.
    async fn summarize(&self, summary: &IncidentSummary) -> DetectorResult<String>;
}
