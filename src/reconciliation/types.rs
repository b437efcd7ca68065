use crate::catalog::{EntryState, TrackedEntry, VersioningStrategy};
use crate::remote::{FetchedArtifact, RemoteError};
use crate::rollout::RolloutError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which of {version label, content bytes} changed since the last run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Version,
    Content,
    Both,
}

impl UpdateType {
    /// `None` when nothing changed
    pub fn classify(version_changed: bool, content_changed: bool) -> Option<Self> {
        match (version_changed, content_changed) {
            (true, true) => Some(UpdateType::Both),
            (true, false) => Some(UpdateType::Version),
            (false, true) => Some(UpdateType::Content),
            (false, false) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Version => "version",
            UpdateType::Content => "content",
            UpdateType::Both => "both",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure classes reported per entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    NotFoundRemote,
    AuthFailure,
    TransportFailure,
    ExtractionFailure,
    PathFormatFailure,
    PersistFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFoundRemote => "not-found-remote",
            ErrorKind::AuthFailure => "auth-failure",
            ErrorKind::TransportFailure => "transport-failure",
            ErrorKind::ExtractionFailure => "extraction-failure",
            ErrorKind::PathFormatFailure => "path-format-failure",
            ErrorKind::PersistFailure => "persist-failure",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("No numbered rollouts found under {0}")]
    NoRolloutsFound(String),

    #[error("Invalid rollout spec path: {0}")]
    InvalidRolloutPath(String),

    #[error("No version field found in {0}")]
    VersionNotFound(String),

    #[error("Failed to persist artifact: {0}")]
    Persist(String),
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::Remote(RemoteError::NotFound(_)) => ErrorKind::NotFoundRemote,
            ReconcileError::Remote(RemoteError::Auth { .. }) => ErrorKind::AuthFailure,
            ReconcileError::Remote(RemoteError::Transport { .. }) => ErrorKind::TransportFailure,
            ReconcileError::NoRolloutsFound(_) => ErrorKind::NotFoundRemote,
            ReconcileError::InvalidRolloutPath(_) => ErrorKind::PathFormatFailure,
            ReconcileError::VersionNotFound(_) => ErrorKind::ExtractionFailure,
            ReconcileError::Persist(_) => ErrorKind::PersistFailure,
        }
    }
}

impl From<RolloutError> for ReconcileError {
    fn from(err: RolloutError) -> Self {
        match err {
            RolloutError::NoRolloutsFound(path) => ReconcileError::NoRolloutsFound(path),
            RolloutError::InvalidPath(path) => ReconcileError::InvalidRolloutPath(path),
            RolloutError::Remote(remote) => ReconcileError::Remote(remote),
        }
    }
}

/// A new revision to publish
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult {
    pub vendor: String,
    pub api: String,
    pub name: String,
    pub strategy: VersioningStrategy,
    pub old_version: String,
    pub new_version: String,
    /// Version embedded in the spec, or the strategy fallback
    pub api_version: String,
    pub download_url: String,
    /// `{vendor}/{api}/{dir}/` relative to the specs directory
    pub local_path: String,
    pub file_name: String,
    pub content_changed: bool,
    pub update_type: UpdateType,
    pub content: String,
    pub content_hash: String,
    /// Entry fields to apply once the artifact is persisted
    pub next_state: EntryState,
}

/// What a strategy observed, before it is tied back to the entry
#[derive(Debug)]
pub(crate) struct Candidate {
    pub new_version: String,
    pub api_version: String,
    pub directory: String,
    pub spec_path: String,
    pub file_name: String,
    pub artifact: FetchedArtifact,
    pub content_hash: String,
    pub content_changed: bool,
    pub update_type: UpdateType,
}

impl UpdateResult {
    pub(crate) fn from_candidate(entry: &TrackedEntry, candidate: Candidate) -> Self {
        let local_path = format!(
            "{}/{}/{}/",
            entry.vendor,
            entry.api,
            path_segment(&candidate.directory)
        );

        Self {
            vendor: entry.vendor.clone(),
            api: entry.api.clone(),
            name: entry.name.clone(),
            strategy: entry.versioning_strategy,
            old_version: entry.last_version.clone(),
            new_version: candidate.new_version.clone(),
            api_version: candidate.api_version,
            download_url: candidate.artifact.url,
            local_path,
            file_name: candidate.file_name,
            content_changed: candidate.content_changed,
            update_type: candidate.update_type,
            content: candidate.artifact.content,
            content_hash: candidate.content_hash.clone(),
            next_state: EntryState {
                last_version: candidate.new_version,
                spec_path: candidate.spec_path,
                last_content_hash: candidate.content_hash,
            },
        }
    }
}

/// Result of reconciling one entry
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationOutcome {
    NoChange,
    Update(Box<UpdateResult>),
    Failed(ReconcileError),
}

impl ReconciliationOutcome {
    pub fn as_update(&self) -> Option<&UpdateResult> {
        match self {
            ReconciliationOutcome::Update(update) => Some(update),
            _ => None,
        }
    }

    pub fn is_no_change(&self) -> bool {
        matches!(self, ReconciliationOutcome::NoChange)
    }
}

/// Last segment of a remote path
pub(crate) fn file_name_of(path: &str) -> String {
    path.rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// Make a version label safe to use as one directory name
fn path_segment(label: &str) -> String {
    let cleaned = label.trim().replace(['/', '\\'], "-");
    match cleaned.as_str() {
        "" | "." | ".." => "unknown".to_string(),
        _ => cleaned,
    }
}
