//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Media error: {0}")]
    Media(#[from] drishti_media::MediaError),

    #[error("Detector error: {0}")]
    Detector(#[from] drishti_detector::DetectorError),

    #[error("Report error: {0}")]
    Report(#[from] drishti_report::ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
