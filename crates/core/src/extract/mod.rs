//! PDF text extraction adapters.
//!
//! The detector never talks to a PDF library directly; it consumes
//! positioned fragments through the [`FragmentSource`] capability, which the
//! caller injects at construction time. This keeps the parsing backend's
//! lifecycle (load once, fail fast) in the hands of the composition root.

mod lopdf_source;

pub use lopdf_source::LopdfSource;

use crate::error::Result;
use crate::fragment::PageFragments;

/// Capability that turns PDF bytes into per-page positioned fragments.
pub trait FragmentSource {
    /// Extracts positioned fragments for every page, in page order with
    /// 1-based page numbers.
    ///
    /// Fails with [`crate::DetectError::DocumentParse`] if the bytes are not
    /// a parseable PDF; no partial output is produced. Fragment order
    /// within a page carries no reading-order guarantee.
    fn fragments(&self, pdf_data: &[u8]) -> Result<Vec<PageFragments>>;
}
