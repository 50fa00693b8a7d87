//! Field boundary resolution.
//!
//! Given a validated candidate, computes the rectangle of the fillable
//! blank: from the end of the governing label (the closest preceding colon)
//! to the end of the filler run, stopping before the next label or fixed
//! text. The rectangle of the digits themselves was already measured by the
//! scanner; this module resolves the blank around them.

use crate::params::is_filler;

use super::line::LineContext;
use super::scan::PlaceholderCandidate;

/// Resolved horizontal extent of the fillable blank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FieldBounds {
    pub x: f64,
    pub width: f64,
}

/// Computes the blank's horizontal extent, or `None` when no sane extent
/// exists (a malformed or unusually fragmented line must not produce a
/// degenerate rectangle).
pub(crate) fn resolve_bounds(
    context: &LineContext,
    candidate: &PlaceholderCandidate,
) -> Option<FieldBounds> {
    let start = left_boundary(context, candidate);
    let end = right_boundary(context, candidate);

    let width = end - start;
    if !width.is_finite() || width <= 0.0 {
        return None;
    }
    Some(FieldBounds { x: start, width })
}

/// Left edge of the blank.
///
/// The governing label is the colon with the largest x still left of the
/// marker token; the blank starts at the first filler character after it.
/// Without any colon the gathered context's leftmost edge is used; with a
/// colon but no following filler, the blank starts where the label ends.
fn left_boundary(context: &LineContext, candidate: &PlaceholderCandidate) -> f64 {
    let mut governing_colon = None;
    for (index, span) in context.spans.iter().enumerate() {
        if span.ch == ':' && span.x1 <= candidate.token_x0 {
            // Spans are x-sorted, so the last hit is the closest label.
            governing_colon = Some(index);
        }
    }

    let Some(colon_index) = governing_colon else {
        return context.min_x;
    };

    context.spans[colon_index + 1..]
        .iter()
        .filter(|s| s.x0 < candidate.token_x0)
        .find(|s| is_filler(s.ch))
        .map(|s| s.x0)
        .unwrap_or(context.spans[colon_index].x1)
}

/// Right edge of the blank.
///
/// Walks the spans right of the marker token: filler extends the edge,
/// whitespace is skipped, and a colon (next field's label) or any other
/// non-filler text closes the run. With nothing to extend it, the edge
/// stays at the token's right side.
fn right_boundary(context: &LineContext, candidate: &PlaceholderCandidate) -> f64 {
    let mut last_separator_end = candidate.token_x1;

    for span in &context.spans {
        if span.x0 < candidate.token_x1 {
            continue;
        }
        if is_filler(span.ch) {
            last_separator_end = span.x1;
            continue;
        }
        if span.ch.is_whitespace() {
            continue;
        }
        break;
    }

    last_separator_end
}
