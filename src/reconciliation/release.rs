use super::types::{
    file_name_of, Candidate, ReconcileError, ReconciliationOutcome, UpdateResult, UpdateType,
};
use crate::catalog::TrackedEntry;
use crate::remote::RemoteSource;
use crate::utils::{compute_hash, content_changed};
use crate::version::{extract_version, strip_tag_prefix};
use tracing::{debug, info};

/// Track the latest GitHub release of the entry's repository.
///
/// Drafts and pre-releases are skipped without fetching content. The spec
/// comes from the named release asset when the release has one, otherwise
/// from `spec_path` at the tag.
pub(crate) async fn reconcile_release(
    entry: &TrackedEntry,
    source: &dyn RemoteSource,
) -> Result<ReconciliationOutcome, ReconcileError> {
    let release = source.latest_release(&entry.owner, &entry.repo).await?;

    if release.is_draft || release.is_prerelease {
        info!(
            entry = %entry.key(),
            tag = %release.tag,
            "Skipping draft or pre-release"
        );
        return Ok(ReconciliationOutcome::NoChange);
    }

    let version_changed = release.tag != entry.last_version;

    let (artifact, file_name) = match release.asset(&entry.release_asset_name) {
        Some(asset) => {
            debug!(entry = %entry.key(), asset = %asset.name, "Fetching release asset");
            let artifact = source
                .fetch_release_asset(&entry.owner, &entry.repo, &release.tag, &asset.name)
                .await?;
            (artifact, asset.name.clone())
        }
        None => {
            let artifact = source
                .fetch_file(&entry.owner, &entry.repo, &release.tag, &entry.spec_path)
                .await?;
            (artifact, file_name_of(&entry.spec_path))
        }
    };

    let content_hash = compute_hash(&artifact.content);
    let content_changed = content_changed(entry.last_content_hash.as_deref(), &content_hash);

    let Some(update_type) = UpdateType::classify(version_changed, content_changed) else {
        return Ok(ReconciliationOutcome::NoChange);
    };

    let api_version = extract_version(&artifact.content)
        .unwrap_or_else(|| strip_tag_prefix(&release.tag).to_string());

    let candidate = Candidate {
        new_version: release.tag.clone(),
        directory: api_version.clone(),
        api_version,
        spec_path: entry.spec_path.clone(),
        file_name,
        artifact,
        content_hash,
        content_changed,
        update_type,
    };

    Ok(ReconciliationOutcome::Update(Box::new(
        UpdateResult::from_candidate(entry, candidate),
    )))
}
