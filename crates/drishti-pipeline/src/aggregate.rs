//! Result aggregation.
//!
//! A pure reduction from per-frame results to an [`IncidentSummary`].
//! Set-typed accumulators are built incrementally, so duplicate concerns
//! and actions collapse regardless of arrival order.

use std::collections::BTreeSet;

use chrono::Utc;

use drishti_models::{FrameAnalysisResult, IncidentSummary, RiskLevel, SeverityBreakdown};

/// Reduce a result sequence into a severity-scored summary.
///
/// Only successful results that flagged an anomaly count toward the
/// breakdown. A short sequence (cancelled run) is treated as "fewer frames
/// analyzed", never an error. `narrative` is carried through unmodified.
pub fn aggregate(results: &[FrameAnalysisResult], narrative: Option<String>) -> IncidentSummary {
    let mut severity_breakdown = SeverityBreakdown::new();
    let mut unique_concerns = BTreeSet::new();
    let mut recommended_actions = BTreeSet::new();
    let mut anomalies_detected = 0u32;

    for result in results.iter().filter(|r| r.is_anomaly()) {
        anomalies_detected += 1;
        severity_breakdown.record(result.severity);
        unique_concerns.extend(result.safety_concerns.iter().cloned());
        recommended_actions.extend(result.recommended_actions.iter().cloned());
    }

    IncidentSummary {
        total_frames: results.len() as u32,
        anomalies_detected,
        risk_level: RiskLevel::from_breakdown(&severity_breakdown),
        severity_breakdown,
        unique_concerns,
        recommended_actions,
        narrative,
        generated_at: Utc::now(),
    }
}
