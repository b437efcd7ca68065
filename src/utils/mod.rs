mod hash;

pub use hash::{compute_bytes_hash, compute_hash, content_changed};

use std::path::{Path, PathBuf};

/// Default catalog file name
pub const CATALOG_FILE: &str = "catalog.json";

/// Default directory that published specs are written under
pub const SPECS_FOLDER: &str = "specs";

/// Name of the sidecar written next to every published artifact
pub const METADATA_FILE: &str = "metadata.json";

/// Current tracker version, reported in User-Agent headers and metadata
pub const TRACKER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve the on-disk directory for a `{vendor}/{api}/{dir}/` relative path
pub fn get_artifact_dir(specs_dir: &Path, local_path: &str) -> PathBuf {
    specs_dir.join(local_path.trim_end_matches('/'))
}

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Get today's date as `YYYY-MM-DD`
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
