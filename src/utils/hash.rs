use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of a string
pub fn compute_hash(content: &str) -> String {
    compute_bytes_hash(content.as_bytes())
}

/// Compute SHA-256 hash of raw bytes
pub fn compute_bytes_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Whether content differs from the last recorded hash.
/// A missing or empty previous hash always counts as a change (first observation).
pub fn content_changed(previous: Option<&str>, current: &str) -> bool {
    match previous {
        Some(prev) if !prev.is_empty() => prev != current,
        _ => true,
    }
}
