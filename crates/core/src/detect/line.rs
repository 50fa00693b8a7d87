//! Line-context gathering around a candidate.
//!
//! PDF renderers guarantee no line-based fragment ordering, so "the text
//! around this marker" is approximated spatially: fragments within a
//! baseline tolerance band and a horizontal window of the token are
//! gathered, sorted by x, and flattened into per-character spans. Both the
//! separator filter and the boundary resolver consume this one substrate,
//! so a colon mid-fragment and a colon in its own fragment behave
//! identically.

use itertools::Itertools;

use crate::fragment::TextFragment;
use crate::params::{DetectorParams, is_filler};

use super::scan::PlaceholderCandidate;

/// One character of line context with its estimated horizontal span.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CharSpan {
    pub ch: char,
    /// Left edge of the character.
    pub x0: f64,
    /// Right edge of the character.
    pub x1: f64,
}

/// Fragments near a candidate, flattened into x-ordered character spans.
#[derive(Debug)]
pub(crate) struct LineContext {
    pub spans: Vec<CharSpan>,
    /// Leftmost x of any gathered fragment.
    pub min_x: f64,
}

impl LineContext {
    /// Gathers the fragments plausibly on the candidate's visual line.
    pub fn gather(
        fragments: &[TextFragment],
        candidate: &PlaceholderCandidate,
        params: &DetectorParams,
    ) -> Self {
        let lo = candidate.token_x0 - params.scan_range;
        let hi = candidate.token_x1 + params.scan_range;

        let mut spans = Vec::new();
        let mut min_x = f64::INFINITY;

        let nearby = fragments
            .iter()
            .filter(|f| (f.y - candidate.line_y).abs() <= params.line_tolerance)
            .filter(|f| f.x_end() >= lo && f.x <= hi)
            .sorted_by(|a, b| a.x.total_cmp(&b.x));

        for fragment in nearby {
            min_x = min_x.min(fragment.x);
            let char_width = fragment.char_width();
            for (index, ch) in fragment.text.chars().enumerate() {
                let x0 = fragment.x + char_width * index as f64;
                spans.push(CharSpan {
                    ch,
                    x0,
                    x1: x0 + char_width,
                });
            }
        }
        spans.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        if !min_x.is_finite() {
            min_x = candidate.token_x0;
        }

        Self { spans, min_x }
    }

    /// Number of filler characters in the gathered context.
    pub fn filler_count(&self) -> usize {
        self.spans.iter().filter(|s| is_filler(s.ch)).count()
    }

    /// The context text in x order, for diagnostics.
    pub fn combined_text(&self) -> String {
        self.spans.iter().map(|s| s.ch).collect()
    }
}
