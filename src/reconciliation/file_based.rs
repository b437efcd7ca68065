use super::types::{
    file_name_of, Candidate, ReconcileError, ReconciliationOutcome, UpdateResult, UpdateType,
};
use crate::catalog::TrackedEntry;
use crate::remote::RemoteSource;
use crate::utils::{compute_hash, content_changed};
use crate::version::extract_version;

/// Track a single spec file on a branch.
///
/// The version label is the one embedded in the file, so a file without a
/// recognisable `version` field cannot be tracked and fails the entry.
/// Content-only changes keep the same target directory.
pub(crate) async fn reconcile_file(
    entry: &TrackedEntry,
    source: &dyn RemoteSource,
) -> Result<ReconciliationOutcome, ReconcileError> {
    let branch = entry.resolved_branch();

    let artifact = source
        .fetch_file(&entry.owner, &entry.repo, branch, &entry.spec_path)
        .await?;

    let content_hash = compute_hash(&artifact.content);
    let content_changed = content_changed(entry.last_content_hash.as_deref(), &content_hash);

    let api_version = extract_version(&artifact.content)
        .ok_or_else(|| ReconcileError::VersionNotFound(artifact.url.clone()))?;

    let version_changed = api_version != entry.last_version;

    let Some(update_type) = UpdateType::classify(version_changed, content_changed) else {
        return Ok(ReconciliationOutcome::NoChange);
    };

    let candidate = Candidate {
        new_version: api_version.clone(),
        directory: api_version.clone(),
        api_version,
        spec_path: entry.spec_path.clone(),
        file_name: file_name_of(&entry.spec_path),
        artifact,
        content_hash,
        content_changed,
        update_type,
    };

    Ok(ReconciliationOutcome::Update(Box::new(
        UpdateResult::from_candidate(entry, candidate),
    )))
}
