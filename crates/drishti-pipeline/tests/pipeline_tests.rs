//! Pipeline integration tests with deterministic stub capabilities.
//!
//! No FFmpeg or network access: frames are synthetic files whose content
//! encodes their index, and the detector is scripted per frame.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::watch;

use drishti_detector::{
    AnomalyDetector, DetectorError, DetectorResponse, DetectorResult, FrameAnalysis,
    NarrativeGenerator,
};
use drishti_models::{AnalysisStatus, Frame, IncidentSummary, RiskLevel, Severity};
use drishti_pipeline::{aggregate, DispatchOptions, FrameDispatcher};
use drishti_report::{LineKind, ReportRenderer};

/// Detector scripted by frame content.
struct StubDetector<F>(F);

#[async_trait]
impl<F> AnomalyDetector for StubDetector<F>
where
    F: Fn(u32) -> DetectorResult<DetectorResponse> + Send + Sync,
{
    async fn detect(&self, image: &[u8], _mime_type: &str) -> DetectorResult<DetectorResponse> {
        let index: u32 = String::from_utf8_lossy(image).trim().parse().unwrap();
        (self.0)(index)
    }
}

/// Narrative capability that always fails.
struct BrokenNarrator;

#[async_trait]
impl NarrativeGenerator for BrokenNarrator {
    async fn summarize(&self, _summary: &IncidentSummary) -> DetectorResult<String> {
        Err(DetectorError::RequestFailed("narrative service down".to_string()))
    }
}

/// Write `count` synthetic frame files whose content is their index.
fn make_frames(dir: &Path, count: u32) -> Vec<Frame> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("frame_{i:06}.jpg"));
            std::fs::write(&path, i.to_string()).unwrap();
            Frame::new(i, u64::from(i) * 10, path)
        })
        .collect()
}

fn structured(anomaly: bool, severity: &str) -> DetectorResult<DetectorResponse> {
    Ok(DetectorResponse::Structured(FrameAnalysis {
        anomaly_detected: anomaly,
        severity: Some(severity.to_string()),
        description: if anomaly {
            "crowd surge against the front barrier".to_string()
        } else {
            "calm scene".to_string()
        },
        safety_concerns: if anomaly {
            vec!["crowd crush risk".to_string()]
        } else {
            vec![]
        },
        recommended_actions: if anomaly {
            vec!["open side gates".to_string()]
        } else {
            vec![]
        },
        coordinates: None,
    }))
}

fn sequential() -> DispatchOptions {
    DispatchOptions {
        concurrency: 1,
        inter_call_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_dispatch_preserves_length_and_index_order() {
    let dir = tempfile::tempdir().unwrap();
    let frames = make_frames(dir.path(), 6);

    let detector = StubDetector(|_| structured(false, "low"));
    let dispatcher = FrameDispatcher::new(DispatchOptions {
        concurrency: 4,
        inter_call_delay: Duration::ZERO,
    });
    let results = dispatcher.analyze(&frames, &detector).await;

    assert_eq!(results.len(), frames.len());
    for (frame, result) in frames.iter().zip(&results) {
        assert_eq!(result.frame_index, frame.index);
    }
}

#[tokio::test]
async fn test_single_failure_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let frames = make_frames(dir.path(), 5);

    let detector = StubDetector(|index| {
        if index == 2 {
            Err(DetectorError::RequestFailed("503 from upstream".to_string()))
        } else {
            structured(false, "low")
        }
    });
    let dispatcher = FrameDispatcher::new(sequential());
    let results = dispatcher.analyze(&frames, &detector).await;

    assert_eq!(results.len(), 5);
    for result in &results {
        if result.frame_index == 2 {
            assert_eq!(result.status, AnalysisStatus::Error);
            assert!(!result.anomaly_detected);
            assert!(result.error_detail.as_deref().unwrap().contains("503"));
        } else {
            assert_eq!(result.status, AnalysisStatus::Success);
        }
    }
}

#[tokio::test]
async fn test_raw_text_fallback_classification() {
    let dir = tempfile::tempdir().unwrap();
    let frames = make_frames(dir.path(), 2);

    let detector = StubDetector(|index| {
        Ok(DetectorResponse::RawText(if index == 0 {
            "Several people appear to be in distress near the gate".to_string()
        } else {
            "Nothing unusual in this frame".to_string()
        }))
    });
    let dispatcher = FrameDispatcher::new(sequential());
    let results = dispatcher.analyze(&frames, &detector).await;

    assert!(results[0].anomaly_detected);
    assert_eq!(results[0].severity, Severity::Medium);
    assert!(results[0].description.contains("distress"));
    assert!(!results[1].anomaly_detected);
    assert_eq!(results[1].severity, Severity::Low);
}

#[tokio::test]
async fn test_cancelled_run_omits_frames_and_aggregates_short() {
    let dir = tempfile::tempdir().unwrap();
    let frames = make_frames(dir.path(), 8);

    let (tx, rx) = watch::channel(true);
    let detector = StubDetector(|_| structured(true, "high"));
    let dispatcher = FrameDispatcher::new(sequential()).with_cancel(rx);
    let results = dispatcher.analyze(&frames, &detector).await;
    drop(tx);

    assert!(results.is_empty());

    // A short sequence is fewer frames analyzed, not an error
    let summary = aggregate(&results, None);
    assert_eq!(summary.total_frames, 0);
    assert_eq!(summary.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_pacing_throttles_aggregate_rate() {
    let dir = tempfile::tempdir().unwrap();
    let frames = make_frames(dir.path(), 3);

    let detector = StubDetector(|_| structured(false, "low"));
    let dispatcher = FrameDispatcher::new(DispatchOptions {
        concurrency: 2,
        inter_call_delay: Duration::from_millis(30),
    });

    let start = Instant::now();
    let results = dispatcher.analyze(&frames, &detector).await;
    // Three departures paced at 30ms leave at least two full gaps
    assert!(start.elapsed() >= Duration::from_millis(60));
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_end_to_end_high_risk_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let frames = make_frames(dir.path(), 10);

    // 2 of 10 frames report high-severity anomalies
    let detector = StubDetector(|index| {
        if index == 3 || index == 7 {
            structured(true, "high")
        } else {
            structured(false, "low")
        }
    });
    let dispatcher = FrameDispatcher::new(sequential());
    let results = dispatcher.analyze(&frames, &detector).await;
    let summary = aggregate(&results, None);

    assert_eq!(summary.total_frames, 10);
    assert_eq!(summary.anomalies_detected, 2);
    assert_eq!(summary.severity_breakdown.count(Severity::High), 2);
    assert_eq!(summary.severity_breakdown.total(), 2);
    assert_eq!(summary.risk_level, RiskLevel::High);

    // Rendering drops nothing: one bullet per unique concern and action
    let report = ReportRenderer::new().render(&summary);
    let bullets = report
        .lines()
        .filter(|l| l.kind == LineKind::Bullet)
        .count();
    assert_eq!(
        bullets,
        summary.unique_concerns.len() + summary.recommended_actions.len()
    );
}

#[tokio::test]
async fn test_empty_run_produces_valid_report() {
    let detector = StubDetector(|_| structured(false, "low"));
    let dispatcher = FrameDispatcher::new(sequential());
    let results = dispatcher.analyze(&[], &detector).await;
    assert!(results.is_empty());

    let summary = aggregate(&results, None);
    assert_eq!(summary.total_frames, 0);
    assert_eq!(summary.anomalies_detected, 0);
    assert!(summary.severity_breakdown.is_empty());
    assert_eq!(summary.risk_level, RiskLevel::Low);

    let report = ReportRenderer::new().render(&summary);
    assert_eq!(report.pages.len(), 1);
    assert!(report.line_count() > 0);
}

#[tokio::test]
async fn test_narrative_failure_does_not_block_summary() {
    let narrator: Arc<dyn NarrativeGenerator> = Arc::new(BrokenNarrator);
    let summary = aggregate(&[], None);
    let narrative = narrator.summarize(&summary).await.ok();
    let summary = summary.with_narrative(narrative);
    assert!(summary.narrative.is_none());
}
