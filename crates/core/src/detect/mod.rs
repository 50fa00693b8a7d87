//! Placeholder detection pipeline.
//!
//! Candidates are scanned, validated, and resolved per page; pages are
//! independent except for the document-wide de-duplication of numeric
//! values. Page work runs on the rayon pool and is merged strictly in page
//! order, so numeric-value collisions are settled exactly as a sequential
//! pass over the document would settle them.

mod line;
mod resolve;
mod scan;
mod validate;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::error::Result;
use crate::extract::{FragmentSource, LopdfSource};
use crate::fragment::PageFragments;
use crate::params::DetectorParams;
use crate::placeholder::Placeholder;

use line::LineContext;
use resolve::FieldBounds;
use scan::PlaceholderCandidate;

/// Detects numbered fill-in placeholders in PDF documents.
///
/// The extraction backend is injected at construction; detection itself is
/// a pure function of one document into one placeholder list, with no state
/// kept between calls.
pub struct PlaceholderDetector<S: FragmentSource> {
    source: S,
    params: DetectorParams,
}

impl PlaceholderDetector<LopdfSource> {
    /// Detector over the default lopdf-backed extraction adapter.
    pub fn new(params: DetectorParams) -> Self {
        Self::with_source(LopdfSource, params)
    }
}

impl<S: FragmentSource> PlaceholderDetector<S> {
    /// Detector over a caller-supplied extraction adapter.
    pub fn with_source(source: S, params: DetectorParams) -> Self {
        Self { source, params }
    }

    /// Runs detection over one document.
    ///
    /// Returns placeholders ordered by page, then by detection order within
    /// the page, with ids assigned sequentially from 1. A document with no
    /// qualifying markers yields an empty list, not an error.
    pub fn detect(&self, pdf_data: &[u8]) -> Result<Vec<Placeholder>> {
        let pages = self.source.fragments(pdf_data)?;
        let params = &self.params;

        let mut per_page: Vec<(u32, Vec<ScannedCandidate>)> = pages
            .par_iter()
            .map(|page| (page.number, process_page(page, params)))
            .collect();
        per_page.sort_by_key(|(number, _)| *number);

        // First occurrence wins across the whole document, counting every
        // scanned candidate: a value claimed by a candidate that later
        // failed validation stays claimed, as a sequential scan would
        // leave it.
        let mut seen = FxHashSet::default();
        let mut placeholders = Vec::new();
        for (number, scanned) in per_page {
            let mut kept = 0usize;
            for item in scanned {
                if !seen.insert(item.candidate.numeric_value) {
                    trace!(
                        value = item.candidate.numeric_value,
                        page = number,
                        "duplicate numeric value skipped"
                    );
                    continue;
                }
                if let Some(bounds) = item.bounds {
                    let id = placeholders.len() as u32 + 1;
                    placeholders.push(build_placeholder(id, item.candidate, bounds, params));
                    kept += 1;
                }
            }
            debug!(page = number, placeholders = kept, "page processed");
        }

        Ok(placeholders)
    }
}

/// Detects placeholders in PDF bytes using the default lopdf adapter.
///
/// # Arguments
/// * `pdf_data` - PDF file contents as bytes
/// * `params` - Detection parameters (None for defaults)
///
/// # Example
/// ```ignore
/// use fieldmark_core::detect_placeholders;
///
/// let pdf_bytes = std::fs::read("contract.pdf")?;
/// for placeholder in detect_placeholders(&pdf_bytes, None)? {
///     println!("({}) on page {}", placeholder.extracted_key, placeholder.page);
/// }
/// ```
pub fn detect_placeholders(
    pdf_data: &[u8],
    params: Option<DetectorParams>,
) -> Result<Vec<Placeholder>> {
    let params = params.unwrap_or_default();
    PlaceholderDetector::new(params).detect(pdf_data)
}

/// A scanned candidate and, when it survived validation and boundary
/// resolution, its field extent.
struct ScannedCandidate {
    candidate: PlaceholderCandidate,
    bounds: Option<FieldBounds>,
}

fn process_page(page: &PageFragments, params: &DetectorParams) -> Vec<ScannedCandidate> {
    scan::scan_page(page, params)
        .into_iter()
        .map(|candidate| {
            let context = LineContext::gather(&page.fragments, &candidate, params);
            let bounds = if validate::has_filler_evidence(&context, params) {
                resolve::resolve_bounds(&context, &candidate)
            } else {
                trace!(
                    value = candidate.numeric_value,
                    context = %context.combined_text(),
                    "candidate rejected: no filler evidence"
                );
                None
            };
            ScannedCandidate { candidate, bounds }
        })
        .collect()
}

fn build_placeholder(
    id: u32,
    candidate: PlaceholderCandidate,
    bounds: FieldBounds,
    params: &DetectorParams,
) -> Placeholder {
    Placeholder {
        id,
        original: format!("({})", candidate.digits),
        extracted_key: candidate.digits,
        page: candidate.page,
        x: bounds.x,
        y: candidate.line_y,
        width: bounds.width,
        height: candidate.font_size * params.line_height_factor,
        background_x: candidate.background_x,
        background_width: candidate.background_width,
        font_size: candidate.font_size,
        mapped: false,
        tag_id: None,
    }
}
