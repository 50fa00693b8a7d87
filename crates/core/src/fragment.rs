//! Positioned text fragments produced by the extraction adapter.

use serde::Serialize;

/// A positioned glyph run as segmented by the PDF renderer.
///
/// Fragment order within a page follows content-stream order, which is not
/// guaranteed to be reading order; consumers must re-sort by spatial
/// proximity rather than assume list adjacency equals page adjacency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFragment {
    /// String content of the run. May be a single character, a word, or
    /// punctuation, depending on how the renderer segmented the text.
    pub text: String,
    /// Baseline x position in page coordinates.
    pub x: f64,
    /// Baseline y position in page coordinates (increasing upward).
    pub y: f64,
    /// Horizontal extent of the run.
    pub width: f64,
    /// Effective font size, including the text-matrix scale.
    pub font_size: f64,
    /// 1-based page index.
    pub page: u32,
}

impl TextFragment {
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        font_size: f64,
        page: u32,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
            page,
        }
    }

    /// Estimated width of one character, assuming uniform glyph advances
    /// within the run.
    pub fn char_width(&self) -> f64 {
        let len = self.text.chars().count();
        if len == 0 { 0.0 } else { self.width / len as f64 }
    }

    /// Estimated x position of the character at `index` (counted in chars).
    pub fn char_x(&self, index: usize) -> f64 {
        self.x + self.char_width() * index as f64
    }

    /// Right edge of the run.
    pub fn x_end(&self) -> f64 {
        self.x + self.width
    }
}

/// The fragments of a single page, in extraction order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFragments {
    /// 1-based page number.
    pub number: u32,
    pub fragments: Vec<TextFragment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_positions_are_proportional() {
        let frag = TextFragment::new("abcd", 100.0, 700.0, 40.0, 12.0, 1);
        assert_eq!(frag.char_width(), 10.0);
        assert_eq!(frag.char_x(0), 100.0);
        assert_eq!(frag.char_x(3), 130.0);
        assert_eq!(frag.x_end(), 140.0);
    }

    #[test]
    fn empty_text_has_zero_char_width() {
        let frag = TextFragment::new("", 10.0, 20.0, 0.0, 12.0, 1);
        assert_eq!(frag.char_width(), 0.0);
    }
}
