pub mod catalog;
pub mod config;
pub mod publish;
pub mod reconciliation;
pub mod remote;
pub mod rollout;
pub mod run;
pub mod template;
pub mod utils;
pub mod version;

// Re-export commonly used types
pub use catalog::{
    read_catalog, write_catalog, Catalog, CatalogError, EntryState, TrackedEntry,
    VersioningStrategy,
};
pub use config::{read_config, ConfigError, GitHubConfig, SubmissionConfig, TrackerConfig};
pub use publish::{
    persist_artifact, ArtifactMetadata, ChangeSubmitter, GitHubSubmitter, GitWorkspace,
    PublishError, SubmitError,
};
pub use reconciliation::{
    reconcile, reconcile_all, reconcile_in_place, ErrorKind, ReconcileError,
    ReconciliationOutcome, UpdateResult, UpdateType,
};
pub use remote::{
    FetchedArtifact, GitHubSource, ReleaseAsset, ReleaseInfo, RemoteError, RemoteSource,
};
pub use rollout::{latest_rollout, split_rollout_path, Rollout, RolloutError, RolloutPath};
pub use run::{run, EntryReport, EntryStatus, RunError, RunOptions, RunReport, Submission};
pub use template::{ChangeContext, ChangeItem, FailureItem, TemplateEngine, TemplateError};
pub use utils::{compute_hash, content_changed};
pub use version::{extract_version, strip_tag_prefix};
