//! Access to the remote repositories that host tracked specs.
//!
//! The reconciliation engine only sees the [`RemoteSource`] trait. The
//! GitHub implementation lives in [`github`].

mod github;
mod types;

pub use github::GitHubSource;
pub(crate) use github::build_client;
pub use types::{FetchedArtifact, ReleaseAsset, ReleaseInfo};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed ({status}): {url}")]
    Auth { status: u16, url: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl RemoteError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            404 => RemoteError::NotFound(url.to_string()),
            401 | 403 => RemoteError::Auth {
                status,
                url: url.to_string(),
            },
            _ => RemoteError::Transport {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            },
        }
    }
}

/// Capabilities the reconciliation engine needs from a remote host.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Latest published release of `owner/repo`
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<ReleaseInfo, RemoteError>;

    /// Names of the entries directly under `path` (one level)
    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Vec<String>, RemoteError>;

    /// Raw file text at a branch, tag or commit
    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<FetchedArtifact, RemoteError>;

    /// Text of an asset attached to a release
    async fn fetch_release_asset(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        asset_name: &str,
    ) -> Result<FetchedArtifact, RemoteError>;
}
