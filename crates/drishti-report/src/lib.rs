//! Paginated report rendering for incident summaries.
//!
//! A pure, stateless transformation of an [`drishti_models::IncidentSummary`]
//! into a typed, paginated [`Report`] artifact, plus a plain-text writer.
//! The renderer has no notion of frames, networks, or detectors.

pub mod error;
pub mod layout;
pub mod renderer;
pub mod report;

pub use error::{ReportError, ReportResult};
pub use layout::PageLayout;
pub use renderer::ReportRenderer;
pub use report::{Line, LineKind, Page, Report};
