//! fieldmark - placeholder detection for contract PDF form overlays.
//!
//! Finds numbered fill-in markers such as `(1)` sitting inside dotted or
//! underscored blanks in a PDF, and resolves the exact rectangle of each
//! blank so a caller can overlay input fields on it.
//!
//! The main entry points are [`detect_placeholders`] for one-shot detection
//! with the default `lopdf`-backed extraction adapter, and
//! [`PlaceholderDetector`] for callers that inject their own
//! [`FragmentSource`].

pub mod detect;
pub mod error;
pub mod extract;
pub mod fragment;
pub mod params;
pub mod placeholder;

pub use detect::{PlaceholderDetector, detect_placeholders};
pub use error::{DetectError, Result};
pub use extract::{FragmentSource, LopdfSource};
pub use fragment::{PageFragments, TextFragment};
pub use params::DetectorParams;
pub use placeholder::Placeholder;
