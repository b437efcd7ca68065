use super::types::{
    file_name_of, Candidate, ReconcileError, ReconciliationOutcome, UpdateResult, UpdateType,
};
use crate::catalog::TrackedEntry;
use crate::remote::RemoteSource;
use crate::rollout::{latest_rollout, split_rollout_path};
use crate::utils::{compute_hash, content_changed};
use crate::version::extract_version;
use tracing::debug;

/// Track the highest numbered directory under `<prefix>/Rollouts/`.
///
/// Rollout paths move between runs, so the resolved spec path is part of
/// the state handed back to the caller. The path keeps the directory name
/// as listed (`006`), while versions use the plain number.
pub(crate) async fn reconcile_rollout(
    entry: &TrackedEntry,
    source: &dyn RemoteSource,
) -> Result<ReconciliationOutcome, ReconcileError> {
    let branch = entry.resolved_branch();
    let rollout_path = split_rollout_path(&entry.spec_path)?;

    let latest = latest_rollout(
        source,
        &entry.owner,
        &entry.repo,
        branch,
        &rollout_path.base_path,
    )
    .await?;
    let latest_label = latest.number.to_string();

    let rollout_changed = latest_label != entry.last_version;
    let spec_path = if rollout_path.rollout == latest.name {
        entry.spec_path.clone()
    } else {
        rollout_path.with_rollout(&latest.name)
    };

    debug!(
        entry = %entry.key(),
        rollout = latest.number,
        spec_path = %spec_path,
        "Resolved rollout"
    );

    let artifact = source
        .fetch_file(&entry.owner, &entry.repo, branch, &spec_path)
        .await?;

    let content_hash = compute_hash(&artifact.content);
    let content_changed = content_changed(entry.last_content_hash.as_deref(), &content_hash);

    let Some(update_type) = UpdateType::classify(rollout_changed, content_changed) else {
        return Ok(ReconciliationOutcome::NoChange);
    };

    let api_version = extract_version(&artifact.content).unwrap_or_else(|| latest_label.clone());

    let candidate = Candidate {
        new_version: latest_label,
        api_version,
        directory: format!("rollout-{}", latest.number),
        file_name: file_name_of(&spec_path),
        spec_path,
        artifact,
        content_hash,
        content_changed,
        update_type,
    };

    Ok(ReconciliationOutcome::Update(Box::new(
        UpdateResult::from_candidate(entry, candidate),
    )))
}
