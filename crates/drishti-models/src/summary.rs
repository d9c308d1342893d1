//! Aggregated incident summary.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::{RiskLevel, SeverityBreakdown};

/// Severity-scored summary of one pipeline run.
///
/// Invariants maintained by the aggregator:
/// - `anomalies_detected` equals the number of successful results that
///   flagged an anomaly
/// - `severity_breakdown.total() == anomalies_detected`
/// - `risk_level` is a pure function of `severity_breakdown`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentSummary {
    /// Number of frames that were analyzed (including failed ones)
    pub total_frames: u32,
    /// Number of frames with a confirmed anomaly
    pub anomalies_detected: u32,
    /// Anomaly counts per severity level
    pub severity_breakdown: SeverityBreakdown,
    /// De-duplicated safety concerns across all anomalous frames
    pub unique_concerns: BTreeSet<String>,
    /// De-duplicated recommended actions across all anomalous frames
    pub recommended_actions: BTreeSet<String>,
    /// Overall risk classification
    pub risk_level: RiskLevel,
    /// Optional prose narrative from the summarization capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// When the summary was produced
    pub generated_at: DateTime<Utc>,
}

impl IncidentSummary {
    /// Create an empty summary for a run that analyzed no frames.
    pub fn empty() -> Self {
        Self {
            total_frames: 0,
            anomalies_detected: 0,
            severity_breakdown: SeverityBreakdown::new(),
            unique_concerns: BTreeSet::new(),
            recommended_actions: BTreeSet::new(),
            risk_level: RiskLevel::Low,
            narrative: None,
            generated_at: Utc::now(),
        }
    }

    /// Attach a narrative produced by the summarization capability.
    pub fn with_narrative(mut self, narrative: Option<String>) -> Self {
        self.narrative = narrative;
        self
    }
}
