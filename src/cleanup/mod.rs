//! Line cleanup between layout reconstruction and structural parsing.
//!
//! Boilerplate stripping works on whole pages; normalization works on the
//! flattened line stream.

pub mod boilerplate;
pub mod normalize;

pub use boilerplate::{apply_page_offset, infer_page_offset, BoilerplateStripper, StripOutcome};
pub use normalize::{dehyphenate, normalize_lines, normalize_text};
