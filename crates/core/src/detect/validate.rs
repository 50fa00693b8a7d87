//! Separator validation.
//!
//! A parenthesized number is only a field marker when it sits inside a
//! dotted or underscored blank. Bare parentheticals (years, page counters,
//! cross-references) have ordinary prose around them and are rejected here.

use crate::params::DetectorParams;

use super::line::LineContext;

/// Returns true when the line context carries enough filler characters for
/// the candidate to count as a fill-in blank.
pub(crate) fn has_filler_evidence(context: &LineContext, params: &DetectorParams) -> bool {
    context.filler_count() >= params.min_filler_count
}
