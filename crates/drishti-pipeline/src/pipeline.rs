//! End-to-end pipeline orchestration.
//!
//! One linear traversal per video: Sample -> Dispatch -> Aggregate ->
//! Render. No stage reaches back into an earlier stage's state, and a
//! failure inside Dispatch is absorbed per frame rather than restarting
//! the run.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use drishti_detector::{AnomalyDetector, NarrativeGenerator};
use drishti_media::{fetch_video, FrameSampler};
use drishti_models::{Frame, FrameAnalysisResult, IncidentSummary};
use drishti_report::{Report, ReportRenderer};

use crate::aggregate::aggregate;
use crate::config::PipelineConfig;
use crate::dispatch::{DispatchOptions, FrameDispatcher};
use crate::error::PipelineResult;
use crate::logging::RunLogger;

/// Everything the analysis stages produced, before rendering.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub frames: Vec<Frame>,
    pub results: Vec<FrameAnalysisResult>,
    pub summary: IncidentSummary,
}

/// Output of a full pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub frames: Vec<Frame>,
    pub results: Vec<FrameAnalysisResult>,
    pub summary: IncidentSummary,
    pub report: Report,
    pub report_path: PathBuf,
}

/// Runs the incident-analysis pipeline over one video source.
pub struct VideoPipeline {
    config: PipelineConfig,
    detector: Arc<dyn AnomalyDetector>,
    narrator: Option<Arc<dyn NarrativeGenerator>>,
    cancel: Option<watch::Receiver<bool>>,
}

impl VideoPipeline {
    /// Create a pipeline with the given detection capability.
    pub fn new(config: PipelineConfig, detector: Arc<dyn AnomalyDetector>) -> Self {
        Self {
            config,
            detector,
            narrator: None,
            cancel: None,
        }
    }

    /// Attach the optional narrative capability.
    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    /// Attach a cancellation flag; flipping it abandons the run between
    /// frames.
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run sampling, dispatch and aggregation, but no rendering.
    ///
    /// The summary this returns is valid on its own, independent of whether
    /// a report can later be written.
    pub async fn analyze(&self, source: &str) -> PipelineResult<AnalysisOutcome> {
        let run_id = Uuid::new_v4().to_string();
        let run_dir = self.config.work_dir.join(&run_id);
        let logger = RunLogger::new(&run_id, "sample");
        logger.log_start(&format!("analyzing source {}", source));

        // Remote sources are fetched into the run directory first
        let local_source = if drishti_media::download::is_remote_source(source) {
            fetch_video(source, run_dir.join("source.mp4")).await?
        } else {
            PathBuf::from(source)
        };

        let sampler = FrameSampler::new(run_dir.join("frames"));
        let frames = sampler.sample(&local_source, self.config.max_frames).await?;
        logger.log_progress(&format!("sampled {} frames", frames.len()));

        let dispatch_logger = logger.stage("dispatch");
        dispatch_logger.log_start(&format!(
            "dispatching {} frames (concurrency {})",
            frames.len(),
            self.config.dispatch_concurrency
        ));
        let mut dispatcher = FrameDispatcher::new(DispatchOptions {
            concurrency: self.config.dispatch_concurrency,
            inter_call_delay: self.config.inter_call_delay,
        });
        if let Some(cancel) = &self.cancel {
            dispatcher = dispatcher.with_cancel(cancel.clone());
        }
        let results = dispatcher.analyze(&frames, self.detector.as_ref()).await;
        dispatch_logger.log_completion(&format!("{} results", results.len()));

        let summary = aggregate(&results, None);
        let narrative = self.generate_narrative(&logger, &summary).await;
        let summary = summary.with_narrative(narrative);

        logger.stage("aggregate").log_completion(&format!(
            "{} anomalies across {} frames, risk {}",
            summary.anomalies_detected, summary.total_frames, summary.risk_level
        ));

        Ok(AnalysisOutcome {
            frames,
            results,
            summary,
        })
    }

    /// Run the full pipeline and write the report artifact.
    pub async fn run(&self, source: &str) -> PipelineResult<PipelineOutput> {
        let outcome = self.analyze(source).await?;

        let report = ReportRenderer::new().render(&outcome.summary);
        let report_path = self
            .config
            .report_path
            .clone()
            .unwrap_or_else(|| self.config.work_dir.join("report.txt"));
        if let Some(parent) = report_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        report.write_text(&report_path)?;

        Ok(PipelineOutput {
            frames: outcome.frames,
            results: outcome.results,
            summary: outcome.summary,
            report,
            report_path,
        })
    }

    /// Narrative generation is best-effort: a failure leaves the summary
    /// without prose, never without a summary.
    async fn generate_narrative(
        &self,
        logger: &RunLogger,
        summary: &IncidentSummary,
    ) -> Option<String> {
        let narrator = self.narrator.as_ref()?;
        let logger = logger.stage("narrative");
        match narrator.summarize(summary).await {
            Ok(text) => {
                logger.log_completion("narrative generated");
                Some(text)
            }
            Err(e) => {
                logger.log_warning(&format!("narrative generation failed: {e}"));
                None
            }
        }
    }
}
