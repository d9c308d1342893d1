//! Page geometry and text wrapping.

/// Page geometry in points, A4 portrait by default.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Page width in points
    pub page_width: f64,
    /// Page height in points
    pub page_height: f64,
    /// Left margin in points
    pub left_margin: f64,
    /// Right margin in points
    pub right_margin: f64,
    /// Cursor start below the top edge, in points
    pub top_margin: f64,
    /// Lines are never drawn below this y value
    pub bottom_margin: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            left_margin: 50.0,
            right_margin: 50.0,
            top_margin: 50.0,
            bottom_margin: 60.0,
        }
    }
}

impl PageLayout {
    /// Printable width between the margins.
    pub fn usable_width(&self) -> f64 {
        self.page_width - self.left_margin - self.right_margin
    }

    /// The y position of the first line on a fresh page.
    pub fn cursor_start(&self) -> f64 {
        self.page_height - self.top_margin
    }

    /// Characters per line for the given font size.
    ///
    /// Approximates average glyph width as 0.6 em: smaller font, more
    /// characters per line.
    pub fn wrap_width(&self, font_size: f64) -> usize {
        ((self.usable_width() / (font_size * 0.6)) as usize).max(1)
    }

    /// Vertical advance for a line of the given font size.
    pub fn line_height(&self, font_size: f64) -> f64 {
        font_size + 5.0
    }

    /// Greedy word-wrap of `text` to fit the printable width at `font_size`.
    ///
    /// Always yields at least one line so blank spacer lines survive
    /// wrapping. Words longer than the line width are split hard.
    pub fn wrap(&self, text: &str, font_size: f64) -> Vec<String> {
        let width = self.wrap_width(font_size);
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let mut word = word;
            // Hard-split words that can never fit on one line
            while word.chars().count() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split: String = word.chars().take(width).collect();
                word = &word[split.len()..];
                lines.push(split);
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };

            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }

        if !current.is_empty() {
            lines.push(current);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_width() {
        let layout = PageLayout::default();
        assert!((layout.usable_width() - 495.28).abs() < 0.01);
    }

    #[test]
    fn test_smaller_font_wraps_wider() {
        let layout = PageLayout::default();
        assert!(layout.wrap_width(10.0) > layout.wrap_width(16.0));
    }

    #[test]
    fn test_wrap_respects_width() {
        let layout = PageLayout::default();
        let text = "word ".repeat(60);
        let lines = layout.wrap(&text, 12.0);
        let width = layout.wrap_width(12.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= width, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_wrap_preserves_all_words() {
        let layout = PageLayout::default();
        let text = "alpha beta gamma delta epsilon zeta eta theta".repeat(5);
        let lines = layout.wrap(&text, 12.0);
        let rejoined = lines.join(" ");
        assert_eq!(
            rejoined.split_whitespace().count(),
            text.split_whitespace().count()
        );
    }

    #[test]
    fn test_wrap_empty_text_yields_blank_line() {
        let layout = PageLayout::default();
        assert_eq!(layout.wrap("", 12.0), vec![String::new()]);
    }

    #[test]
    fn test_wrap_splits_oversized_word() {
        let layout = PageLayout::default();
        let width = layout.wrap_width(12.0);
        let long_word = "x".repeat(width * 2 + 3);
        let lines = layout.wrap(&long_word, 12.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.concat().len(), long_word.len());
    }
}
