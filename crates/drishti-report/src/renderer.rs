//! Incident summary rendering.
//!
//! Emits the report blocks in fixed order and paginates them with a
//! vertical cursor: a line that would fall below the bottom margin starts
//! a new page first, so no line is ever split across pages.

use drishti_models::IncidentSummary;

use crate::layout::PageLayout;
use crate::report::{Line, LineKind, Page, Report};

const TITLE: &str = "Crowd Safety Incident Report";
const TITLE_SIZE: f64 = 16.0;
const BODY_SIZE: f64 = 12.0;
const INDENT: f64 = 10.0;

/// Pure renderer from summary to paginated report.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    layout: PageLayout,
}

impl ReportRenderer {
    /// Create a renderer with the default A4 layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a custom page layout.
    pub fn with_layout(layout: PageLayout) -> Self {
        Self { layout }
    }

    /// Render a summary into a paginated report.
    pub fn render(&self, summary: &IncidentSummary) -> Report {
        let mut cursor = Cursor::new(&self.layout);

        cursor.emit(LineKind::Heading, TITLE, TITLE_SIZE, true, 0.0);
        cursor.emit(
            LineKind::KeyValue,
            &format!(
                "Generated: {}",
                summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            BODY_SIZE,
            false,
            0.0,
        );
        cursor.emit(LineKind::Text, "", BODY_SIZE, false, 0.0);

        cursor.emit(LineKind::Heading, "Summary Statistics:", BODY_SIZE, true, 0.0);
        cursor.emit(
            LineKind::KeyValue,
            &format!("Total Frames Analyzed: {}", summary.total_frames),
            BODY_SIZE,
            false,
            INDENT,
        );
        cursor.emit(
            LineKind::KeyValue,
            &format!("Anomalies Detected: {}", summary.anomalies_detected),
            BODY_SIZE,
            false,
            INDENT,
        );
        cursor.emit(
            LineKind::KeyValue,
            &format!("Risk Level: {}", summary.risk_level),
            BODY_SIZE,
            false,
            INDENT,
        );

        cursor.emit(LineKind::Heading, "Severity Breakdown:", BODY_SIZE, true, 0.0);
        for (severity, count) in summary.severity_breakdown.iter() {
            cursor.emit(
                LineKind::KeyValue,
                &format!("{}: {}", capitalize(severity.as_str()), count),
                BODY_SIZE,
                false,
                INDENT,
            );
        }

        cursor.emit(
            LineKind::Heading,
            "Identified Safety Concerns:",
            BODY_SIZE,
            true,
            0.0,
        );
        for concern in &summary.unique_concerns {
            cursor.emit(
                LineKind::Bullet,
                &format!("- {}", concern),
                BODY_SIZE,
                false,
                INDENT,
            );
        }

        cursor.emit(LineKind::Heading, "Recommended Actions:", BODY_SIZE, true, 0.0);
        for action in &summary.recommended_actions {
            cursor.emit(
                LineKind::Bullet,
                &format!("- {}", action),
                BODY_SIZE,
                false,
                INDENT,
            );
        }

        if let Some(narrative) = &summary.narrative {
            cursor.emit(
                LineKind::Heading,
                "Incident Narrative:",
                BODY_SIZE,
                true,
                0.0,
            );
            for line in narrative.lines() {
                cursor.emit(LineKind::Text, line.trim(), BODY_SIZE, false, INDENT);
            }
        }

        cursor.finish()
    }
}

/// Vertical layout cursor over a growing list of pages.
struct Cursor<'a> {
    layout: &'a PageLayout,
    pages: Vec<Page>,
    current: Vec<Line>,
    y: f64,
}

impl<'a> Cursor<'a> {
    fn new(layout: &'a PageLayout) -> Self {
        Self {
            layout,
            pages: Vec::new(),
            current: Vec::new(),
            y: layout.cursor_start(),
        }
    }

    /// Wrap `text` and append each resulting line, breaking pages as needed.
    fn emit(&mut self, kind: LineKind, text: &str, font_size: f64, bold: bool, indent: f64) {
        for wrapped in self.layout.wrap(text, font_size) {
            if self.y < self.layout.bottom_margin {
                self.break_page();
            }
            self.current.push(Line {
                kind,
                text: wrapped,
                font_size,
                bold,
                indent,
                y: self.y,
            });
            self.y -= self.layout.line_height(font_size);
        }
    }

    fn break_page(&mut self) {
        let number = self.pages.len() as u32 + 1;
        self.pages.push(Page {
            number,
            lines: std::mem::take(&mut self.current),
        });
        self.y = self.layout.cursor_start();
    }

    fn finish(mut self) -> Report {
        // The final page is kept even when empty so a zero-frame run still
        // produces a valid one-page artifact
        let number = self.pages.len() as u32 + 1;
        self.pages.push(Page {
            number,
            lines: self.current,
        });
        Report { pages: self.pages }
    }
}

/// Upper-case the first character of a label.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
