use serde::{Deserialize, Serialize};
use std::fmt;

/// How new revisions of a tracked spec are discovered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VersioningStrategy {
    /// Latest GitHub release tag
    #[default]
    ReleaseTag,
    /// A single file on a branch with the version embedded in its content
    FileBased,
    /// Numbered directories under a `Rollouts/` folder
    RolloutBased,
}

impl VersioningStrategy {
    /// Branch used when the entry does not name one
    pub fn default_branch(&self) -> &'static str {
        match self {
            VersioningStrategy::ReleaseTag | VersioningStrategy::FileBased => "main",
            VersioningStrategy::RolloutBased => "master",
        }
    }
}

impl fmt::Display for VersioningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersioningStrategy::ReleaseTag => "release-tag",
            VersioningStrategy::FileBased => "file-based",
            VersioningStrategy::RolloutBased => "rollout-based",
        };
        f.write_str(name)
    }
}

/// One monitored API specification and its last observed state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntry {
    pub vendor: String,
    pub api: String,
    pub owner: String,
    pub repo: String,
    pub name: String,

    /// Release tag, embedded version, or rollout number depending on strategy
    #[serde(default)]
    pub last_version: String,

    /// Path of the spec inside the remote repository
    pub spec_path: String,

    #[serde(default)]
    pub release_asset_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default)]
    pub versioning_strategy: VersioningStrategy,

    /// SHA-256 of the last fetched content; absent before the first fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_content_hash: Option<String>,

    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub docs_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TrackedEntry {
    /// `vendor/api`, used as the entry key in logs and reports
    pub fn key(&self) -> String {
        format!("{}/{}", self.vendor, self.api)
    }

    /// The configured branch, or the strategy default
    pub fn resolved_branch(&self) -> &str {
        self.branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| self.versioning_strategy.default_branch())
    }

    /// Apply the state produced by a classified update
    pub fn apply_state(&mut self, state: &EntryState) {
        self.last_version = state.last_version.clone();
        self.spec_path = state.spec_path.clone();
        self.last_content_hash = Some(state.last_content_hash.clone());
    }
}

/// The fields reconciliation is allowed to change on an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryState {
    pub last_version: String,
    pub spec_path: String,
    pub last_content_hash: String,
}

/// The catalog file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Schema version for future migrations
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// When the catalog was last written
    #[serde(default)]
    pub updated_at: String,

    pub entries: Vec<TrackedEntry>,
}

fn default_schema_version() -> u32 {
    1
}

impl Catalog {
    pub fn new(entries: Vec<TrackedEntry>) -> Self {
        Self {
            schema_version: default_schema_version(),
            updated_at: crate::utils::now_iso(),
            entries,
        }
    }
}
