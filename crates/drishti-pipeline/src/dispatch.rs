//! Frame analysis dispatch.
//!
//! Drives the detection capability across all sampled frames. The core
//! contract is per-frame failure isolation: a failed capability call, an
//! unreadable frame file, or a malformed response becomes a
//! `status = Error` result (or a heuristic classification for raw text) and
//! never aborts the remaining frames. Output order always matches frame
//! index order, regardless of completion order under concurrency.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, warn};

use drishti_detector::{AnomalyDetector, DetectorResponse, FrameAnalysis};
use drishti_models::{Frame, FrameAnalysisResult, MarkerPoint, Severity};

/// Terms in a free-text response that indicate a safety anomaly. Only
/// "distress" raises the severity above Low.
const DISTRESS_TERM: &str = "distress";
const EMERGENCY_TERM: &str = "emergency";

/// Dispatch behavior knobs.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Maximum in-flight detection calls (1 = strictly sequential)
    pub concurrency: usize,
    /// Minimum interval between consecutive calls, across all slots
    pub inter_call_delay: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            inter_call_delay: Duration::from_millis(100),
        }
    }
}

/// Minimum-interval gate shared by all in-flight calls.
///
/// Serializes departures: each caller waits until at least the configured
/// interval has passed since the previous departure, so the aggregate call
/// rate is throttled even under concurrency.
struct Pacer {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }
        let mut last = self.last.lock().await;
        let now = Instant::now();
        let depart = match *last {
            Some(prev) if prev + self.interval > now => prev + self.interval,
            _ => now,
        };
        // Hold the lock across the sleep so concurrent slots queue up
        tokio::time::sleep_until(depart).await;
        *last = Some(depart);
    }
}

/// Dispatches sampled frames to a detection capability.
pub struct FrameDispatcher {
    options: DispatchOptions,
    cancel: Option<watch::Receiver<bool>>,
}

impl FrameDispatcher {
    /// Create a dispatcher with the given options.
    pub fn new(options: DispatchOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    /// Attach a cancellation flag.
    ///
    /// Frames not yet dispatched when the flag flips to true are omitted
    /// from the output; in-flight frames complete normally.
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Analyze every frame, producing one result per dispatched frame in
    /// frame-index order.
    pub async fn analyze(
        &self,
        frames: &[Frame],
        detector: &dyn AnomalyDetector,
    ) -> Vec<FrameAnalysisResult> {
        let pacer = Arc::new(Pacer::new(self.options.inter_call_delay));
        let concurrency = self.options.concurrency.max(1);

        // `buffered` preserves input order, so results come out index-sorted
        // no matter which calls finish first
        let results: Vec<Option<FrameAnalysisResult>> = stream::iter(frames)
            .map(|frame| {
                let pacer = Arc::clone(&pacer);
                let cancel = self.cancel.clone();
                async move {
                    if let Some(rx) = &cancel {
                        if *rx.borrow() {
                            debug!(frame_index = frame.index, "Run cancelled, skipping frame");
                            return None;
                        }
                    }
                    pacer.wait().await;
                    Some(analyze_frame(frame, detector).await)
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        results.into_iter().flatten().collect()
    }
}

/// Dispatch one frame and absorb every failure mode into its result slot.
async fn analyze_frame(frame: &Frame, detector: &dyn AnomalyDetector) -> FrameAnalysisResult {
    let image = match tokio::fs::read(&frame.content_ref).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(frame_index = frame.index, error = %e, "Failed to read frame content");
            return FrameAnalysisResult::failed(frame.index, format!("failed to read frame: {e}"));
        }
    };

    match detector.detect(&image, "image/jpeg").await {
        Ok(DetectorResponse::Structured(analysis)) => from_structured(frame.index, analysis),
        Ok(DetectorResponse::RawText(text)) => {
            debug!(
                frame_index = frame.index,
                "Detector returned unstructured text, applying heuristic classification"
            );
            classify_raw_text(frame.index, &text)
        }
        Err(e) => {
            warn!(frame_index = frame.index, error = %e, "Detection call failed");
            FrameAnalysisResult::failed(frame.index, e.to_string())
        }
    }
}

/// Convert a well-formed structured analysis into a frame result.
fn from_structured(frame_index: u32, analysis: FrameAnalysis) -> FrameAnalysisResult {
    let severity = analysis.severity();
    FrameAnalysisResult {
        frame_index,
        status: drishti_models::AnalysisStatus::Success,
        anomaly_detected: analysis.anomaly_detected,
        severity,
        description: analysis.description,
        safety_concerns: analysis.safety_concerns,
        recommended_actions: analysis.recommended_actions,
        error_detail: None,
        marker: analysis.coordinates.map(|c| MarkerPoint {
            x: c.x.max(0.0).round() as u32,
            y: c.y.max(0.0).round() as u32,
        }),
    }
}

/// Heuristic classification of a free-text response.
///
/// Guarantees a frame's signal is never dropped just because the upstream
/// model violated its output contract: distress or emergency terms mark an
/// anomaly, and the raw text becomes the description. Severity is Medium
/// only on an explicit distress mention; an emergency-only text stays Low.
fn classify_raw_text(frame_index: u32, text: &str) -> FrameAnalysisResult {
    let lowered = text.to_lowercase();
    let distress = lowered.contains(DISTRESS_TERM);
    let emergency = lowered.contains(EMERGENCY_TERM);

    let mut result = FrameAnalysisResult::clear(frame_index, text);
    result.anomaly_detected = distress || emergency;
    result.severity = if distress { Severity::Medium } else { Severity::Low };
    result
}
