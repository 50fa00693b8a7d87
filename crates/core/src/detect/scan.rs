//! Placeholder candidate scanning.
//!
//! Walks a page's fragments looking for `(N)` marker tokens. Renderers
//! frequently split a marker glyph-by-glyph (`(`, `2`, `6`, `)` as four
//! fragments), so the scanner handles both a whole marker inside one
//! fragment and a marker reassembled from a bounded lookahead window.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use crate::fragment::{PageFragments, TextFragment};
use crate::params::DetectorParams;

/// `(` + digits + `)` within one fragment, tolerating interior whitespace
/// as in `"(2 6)"`.
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*(\d[\d\s]*)\)").expect("marker pattern"));

/// An unvalidated marker token reconstructed from one or more fragments.
#[derive(Debug, Clone)]
pub(crate) struct PlaceholderCandidate {
    /// Concatenated digits, whitespace stripped. Never empty.
    pub digits: String,
    /// Parsed value of `digits`. Never above the configured ceiling.
    pub numeric_value: u32,
    /// Index of the fragment containing the opening parenthesis.
    pub open_index: usize,
    /// Index of the fragment containing the closing parenthesis.
    pub close_index: usize,
    /// Baseline y of the fragment that contributed the first digit; the
    /// anchor for same-line grouping.
    pub line_y: f64,
    /// 1-based page number.
    pub page: u32,
    /// Left edge of the whole `(N)` token.
    pub token_x0: f64,
    /// Right edge of the whole `(N)` token.
    pub token_x1: f64,
    /// Left edge of the digit characters only.
    pub background_x: f64,
    /// Width of the digit characters only.
    pub background_width: f64,
    /// Font size of the fragment containing the first digit.
    pub font_size: f64,
}

impl PlaceholderCandidate {
    /// Parses and bounds-checks the digits; `None` discards the candidate.
    fn parse_value(digits: &str, ceiling: u32) -> Option<u32> {
        if digits.is_empty() {
            return None;
        }
        let value: u32 = digits.parse().ok()?;
        (value <= ceiling).then_some(value)
    }
}

/// Scans one page for marker candidates, in fragment order.
///
/// Document-wide de-duplication of numeric values happens at the page-merge
/// step, not here.
pub(crate) fn scan_page(page: &PageFragments, params: &DetectorParams) -> Vec<PlaceholderCandidate> {
    let mut found = Vec::new();
    let fragments = &page.fragments;

    for (index, fragment) in fragments.iter().enumerate() {
        if !fragment.text.contains('(') {
            continue;
        }

        let whole = whole_fragment_candidates(fragment, index, page.number, params);
        if !whole.is_empty() {
            found.extend(whole);
            continue;
        }

        if let Some(candidate) = split_fragment_candidate(fragments, index, page.number, params) {
            found.push(candidate);
        }
    }

    found
}

/// Single-fragment case: the fragment's own text contains the full
/// `( digits )` pattern, possibly several times.
fn whole_fragment_candidates(
    fragment: &TextFragment,
    index: usize,
    page: u32,
    params: &DetectorParams,
) -> SmallVec<[PlaceholderCandidate; 2]> {
    let mut found = SmallVec::new();
    let char_width = fragment.char_width();

    for captures in MARKER_RE.captures_iter(&fragment.text) {
        let token = captures.get(0).expect("whole match");
        let group = captures.get(1).expect("digit group");

        let digits: String = group.as_str().chars().filter(|c| !c.is_whitespace()).collect();
        let Some(numeric_value) = PlaceholderCandidate::parse_value(&digits, params.numeric_ceiling)
        else {
            continue;
        };

        // Byte offsets from the regex are mapped back onto the fragment's
        // proportional character grid.
        let token_start = char_offset(&fragment.text, token.start());
        let token_len = token.as_str().chars().count();
        let group_start = char_offset(&fragment.text, group.start());
        // The group starts with a digit; trailing whitespace before `)` is
        // excluded from the background span.
        let last_digit = group
            .as_str()
            .chars()
            .enumerate()
            .filter(|&(_, c)| c.is_ascii_digit())
            .last()
            .map_or(0, |(i, _)| i);

        found.push(PlaceholderCandidate {
            digits,
            numeric_value,
            open_index: index,
            close_index: index,
            line_y: fragment.y,
            page,
            token_x0: fragment.char_x(token_start),
            token_x1: fragment.char_x(token_start + token_len),
            background_x: fragment.char_x(group_start),
            background_width: char_width * (last_digit + 1) as f64,
            font_size: fragment.font_size,
        });
    }

    found
}

/// Split-glyph case: the opening parenthesis sits in its own fragment (no
/// digits follow it in that fragment) and the digits and closing
/// parenthesis arrive in subsequent fragments.
fn split_fragment_candidate(
    fragments: &[TextFragment],
    index: usize,
    page: u32,
    params: &DetectorParams,
) -> Option<PlaceholderCandidate> {
    let open = &fragments[index];
    let paren = open.text.char_indices().rev().find(|&(_, c)| c == '(')?;
    // Digits after the parenthesis belong to the single-fragment case; a
    // closing parenthesis means the parenthetical ended inside this
    // fragment without any digits.
    if open.text[paren.0 + 1..]
        .chars()
        .any(|c| c.is_ascii_digit() || c == ')')
    {
        return None;
    }

    let mut digits = String::new();
    let mut digit_indices: SmallVec<[usize; 8]> = SmallVec::new();
    let mut close_index = None;

    let window_end = (index + 1 + params.lookahead_window).min(fragments.len());
    for (next_index, next) in fragments.iter().enumerate().take(window_end).skip(index + 1) {
        let trimmed = next.text.trim();
        if trimmed.starts_with(')') {
            close_index = Some(next_index);
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            digits.push_str(trimmed);
            digit_indices.push(next_index);
            continue;
        }
        // Anything else means this parenthesis does not open a marker.
        return None;
    }

    let close_index = close_index?;
    let numeric_value = PlaceholderCandidate::parse_value(&digits, params.numeric_ceiling)?;

    let first_digit = &fragments[digit_indices[0]];
    let last_digit = &fragments[*digit_indices.last().expect("non-empty digit span")];
    let close = &fragments[close_index];
    let close_paren = char_offset(&close.text, close.text.find(')').unwrap_or(0));

    Some(PlaceholderCandidate {
        digits,
        numeric_value,
        open_index: index,
        close_index,
        line_y: first_digit.y,
        page,
        token_x0: open.char_x(char_offset(&open.text, paren.0)),
        token_x1: close.char_x(close_paren + 1),
        background_x: first_digit.x,
        background_width: last_digit.x_end() - first_digit.x,
        font_size: first_digit.font_size,
    })
}

/// Character index corresponding to a byte offset into `text`.
fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}
