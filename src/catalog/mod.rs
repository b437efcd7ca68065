//! The catalog of tracked API specs.
//!
//! The catalog is a JSON file loaded at the start of a run and written back
//! once at the end. Reconciliation never writes it.

mod storage;
mod types;

pub use storage::{read_catalog, write_catalog};
pub use types::{Catalog, EntryState, TrackedEntry, VersioningStrategy};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Catalog not found at {0}")]
    NotFound(String),
}
