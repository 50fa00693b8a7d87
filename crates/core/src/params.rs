//! Detection parameters.
//!
//! Contains DetectorParams struct for controlling placeholder detection
//! behavior. Every heuristic constant of the detector lives here.

use crate::error::{DetectError, Result};

/// Characters that form the fillable blank around a placeholder marker.
pub const FILLER_CHARS: [char; 3] = ['.', '_', '…'];

/// Returns true if the character is a blank-filler character.
pub fn is_filler(c: char) -> bool {
    FILLER_CHARS.contains(&c)
}

/// Parameters for placeholder detection.
///
/// Controls how fragments are grouped into visual lines, how far boundary
/// scans reach, and which parenthesized numbers qualify as field markers.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorParams {
    /// Largest numeric value accepted as a field marker. Parenthesized
    /// numbers above this are far more likely to be calendar years or page
    /// counters than field numbers, and are discarded.
    pub numeric_ceiling: u32,

    /// Two fragments whose baselines differ by no more than this many page
    /// units are considered to be on the same visual line.
    pub line_tolerance: f64,

    /// Horizontal distance, on each side of the marker token, within which
    /// fragments are gathered as line context for validation and boundary
    /// resolution.
    pub scan_range: f64,

    /// How many fragments past an opening parenthesis the scanner examines
    /// when a marker has been split glyph-by-glyph by the renderer.
    pub lookahead_window: usize,

    /// Minimum number of filler characters that must appear in the line
    /// context for a candidate to count as a fill-in blank rather than
    /// incidental parenthesized text.
    pub min_filler_count: usize,

    /// Multiplier on the marker's font size used as the height of the
    /// resolved field rectangle.
    pub line_height_factor: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            numeric_ceiling: 100,
            line_tolerance: 10.0,
            scan_range: 300.0,
            lookahead_window: 10,
            min_filler_count: 2,
            line_height_factor: 1.2,
        }
    }
}

impl DetectorParams {
    /// Creates new detection parameters with the specified values.
    ///
    /// Fails with [`DetectError::InvalidArgument`] if any tolerance or
    /// factor is not positive, or if a count/window is zero.
    pub fn new(
        numeric_ceiling: u32,
        line_tolerance: f64,
        scan_range: f64,
        lookahead_window: usize,
        min_filler_count: usize,
        line_height_factor: f64,
    ) -> Result<Self> {
        if !(line_tolerance > 0.0) {
            return Err(DetectError::InvalidArgument(format!(
                "line_tolerance must be positive, got {line_tolerance}"
            )));
        }
        if !(scan_range > 0.0) {
            return Err(DetectError::InvalidArgument(format!(
                "scan_range must be positive, got {scan_range}"
            )));
        }
        if !(line_height_factor > 0.0) {
            return Err(DetectError::InvalidArgument(format!(
                "line_height_factor must be positive, got {line_height_factor}"
            )));
        }
        if lookahead_window == 0 {
            return Err(DetectError::InvalidArgument(
                "lookahead_window must be at least 1".to_string(),
            ));
        }
        if min_filler_count == 0 {
            return Err(DetectError::InvalidArgument(
                "min_filler_count must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            numeric_ceiling,
            line_tolerance,
            scan_range,
            lookahead_window,
            min_filler_count,
            line_height_factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let params = DetectorParams::default();
        assert_eq!(params.numeric_ceiling, 100);
        assert_eq!(params.line_tolerance, 10.0);
        assert_eq!(params.scan_range, 300.0);
        assert_eq!(params.lookahead_window, 10);
        assert_eq!(params.min_filler_count, 2);
        assert_eq!(params.line_height_factor, 1.2);
    }

    #[test]
    fn new_rejects_out_of_range_values() {
        assert!(DetectorParams::new(100, 0.0, 300.0, 10, 2, 1.2).is_err());
        assert!(DetectorParams::new(100, 10.0, -1.0, 10, 2, 1.2).is_err());
        assert!(DetectorParams::new(100, 10.0, 300.0, 0, 2, 1.2).is_err());
        assert!(DetectorParams::new(100, 10.0, 300.0, 10, 0, 1.2).is_err());
        assert!(DetectorParams::new(100, 10.0, 300.0, 10, 2, 0.0).is_err());
        assert!(DetectorParams::new(100, 10.0, 300.0, 10, 2, 1.2).is_ok());
    }

    #[test]
    fn filler_characters() {
        assert!(is_filler('.'));
        assert!(is_filler('_'));
        assert!(is_filler('…'));
        assert!(!is_filler('-'));
        assert!(!is_filler(' '));
    }
}
