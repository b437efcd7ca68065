//! Version discovery inside spec documents.
//!
//! Extracted and fallback values are labels only. Nothing here validates
//! them as semantic versions.

mod extract;

pub use extract::{extract_version, strip_tag_prefix};
