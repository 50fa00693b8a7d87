//! Error types for placeholder detection.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, DetectError>;

/// Errors surfaced by the detection pipeline.
///
/// Heuristic misses (a marker without filler evidence, a value above the
/// numeric ceiling) are never errors; they resolve to fewer placeholders in
/// the output list.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The supplied bytes are not a parseable PDF document. Fatal for the
    /// call; no partial output is produced.
    #[error("failed to parse PDF document: {0}")]
    DocumentParse(String),

    /// A detection parameter was outside its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
