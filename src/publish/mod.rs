//! Writing updated specs and proposing them for review.

mod artifact;
mod git;
mod submit;

pub use artifact::{persist_artifact, ArtifactMetadata};
pub use git::{GitError, GitWorkspace};
pub use submit::{ChangeSubmitter, GitHubSubmitter, SubmitError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
