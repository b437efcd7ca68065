use super::PublishError;
use crate::catalog::{TrackedEntry, VersioningStrategy};
use crate::reconciliation::{UpdateResult, UpdateType};
use crate::utils::{get_artifact_dir, now_iso, METADATA_FILE};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Sidecar written next to each published spec
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub vendor: String,
    pub api: String,
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub docs_url: String,
    pub tags: Vec<String>,
    pub api_version: String,
    pub source_version: String,
    pub versioning_strategy: VersioningStrategy,
    pub source_url: String,
    pub content_hash: String,
    pub update_type: UpdateType,
    pub fetched_at: String,
}

impl ArtifactMetadata {
    pub fn new(entry: &TrackedEntry, update: &UpdateResult) -> Self {
        Self {
            vendor: update.vendor.clone(),
            api: update.api.clone(),
            name: update.name.clone(),
            description: entry.description.clone(),
            base_url: entry.base_url.clone(),
            docs_url: entry.docs_url.clone(),
            tags: entry.tags.clone(),
            api_version: update.api_version.clone(),
            source_version: update.new_version.clone(),
            versioning_strategy: update.strategy,
            source_url: update.download_url.clone(),
            content_hash: update.content_hash.clone(),
            update_type: update.update_type,
            fetched_at: now_iso(),
        }
    }
}

/// Write an updated spec under `specs_dir`, overwriting any previous copy.
///
/// Returns the path of the written spec. A failure to write the metadata
/// sidecar is logged and does not fail the call.
pub async fn persist_artifact(
    specs_dir: &Path,
    entry: &TrackedEntry,
    update: &UpdateResult,
) -> Result<PathBuf, PublishError> {
    let dir = get_artifact_dir(specs_dir, &update.local_path);
    fs::create_dir_all(&dir).await?;

    let spec_path = dir.join(&update.file_name);
    fs::write(&spec_path, &update.content).await?;

    info!(
        entry = %entry.key(),
        path = %spec_path.display(),
        update_type = %update.update_type,
        "Wrote spec"
    );

    if let Err(e) = write_metadata(&dir, entry, update).await {
        warn!(
            entry = %entry.key(),
            error = %e,
            "Failed to write metadata, spec was written"
        );
    }

    Ok(spec_path)
}

async fn write_metadata(
    dir: &Path,
    entry: &TrackedEntry,
    update: &UpdateResult,
) -> Result<(), PublishError> {
    let metadata = ArtifactMetadata::new(entry, update);
    let mut content = serde_json::to_string_pretty(&metadata)?;
    content.push('\n');
    fs::write(dir.join(METADATA_FILE), content).await?;
    Ok(())
}
