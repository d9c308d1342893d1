//! The rendered report artifact.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportResult;

/// Role of a rendered line within the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Section or document heading
    Heading,
    /// `Label: value` statistic line
    KeyValue,
    /// Bulleted list entry
    Bullet,
    /// Plain body text
    Text,
}

/// One laid-out line on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
    /// Horizontal indent from the left margin, in points
    pub indent: f64,
    /// Vertical position on the page, in points from the bottom
    pub y: f64,
}

/// A single page of rendered lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub lines: Vec<Line>,
}

/// A paginated report: the terminal artifact of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub pages: Vec<Page>,
}

impl Report {
    /// Total number of rendered lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    /// Iterate all lines in page order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// Render the report as plain text, one page per form-feed section.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push('\x0c');
                out.push('\n');
            }
            for line in &page.lines {
                let indent = " ".repeat((line.indent / 5.0) as usize);
                out.push_str(&indent);
                out.push_str(&line.text);
                out.push('\n');
            }
        }
        out
    }

    /// Write the plain-text rendering to `path`.
    pub fn write_text(&self, path: impl AsRef<Path>) -> ReportResult<()> {
        std::fs::write(path.as_ref(), self.to_text())?;
        Ok(())
    }
}
