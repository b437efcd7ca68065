use super::file_based::reconcile_file;
use super::release::reconcile_release;
use super::rollout::reconcile_rollout;
use super::types::ReconciliationOutcome;
use crate::catalog::{TrackedEntry, VersioningStrategy};
use crate::remote::RemoteSource;
use tracing::{info, warn};

/// Reconcile one entry against its remote source.
///
/// The entry is not modified. An `Update` carries the new entry state in
/// `next_state`, to be applied once the artifact has been persisted.
pub async fn reconcile(entry: &TrackedEntry, source: &dyn RemoteSource) -> ReconciliationOutcome {
    let result = match entry.versioning_strategy {
        VersioningStrategy::ReleaseTag => reconcile_release(entry, source).await,
        VersioningStrategy::FileBased => reconcile_file(entry, source).await,
        VersioningStrategy::RolloutBased => reconcile_rollout(entry, source).await,
    };

    match result {
        Ok(ReconciliationOutcome::Update(update)) => {
            info!(
                entry = %entry.key(),
                strategy = %entry.versioning_strategy,
                old_version = %update.old_version,
                new_version = %update.new_version,
                api_version = %update.api_version,
                update_type = %update.update_type,
                "Update detected"
            );
            ReconciliationOutcome::Update(update)
        }
        Ok(outcome) => {
            info!(entry = %entry.key(), "No change");
            outcome
        }
        Err(e) => {
            warn!(
                entry = %entry.key(),
                kind = %e.kind(),
                error = %e,
                "Reconciliation failed"
            );
            ReconciliationOutcome::Failed(e)
        }
    }
}

/// Reconcile and immediately apply the new state to the entry.
pub async fn reconcile_in_place(
    entry: &mut TrackedEntry,
    source: &dyn RemoteSource,
) -> ReconciliationOutcome {
    let outcome = reconcile(entry, source).await;
    if let Some(update) = outcome.as_update() {
        entry.apply_state(&update.next_state);
    }
    outcome
}

/// Reconcile entries one at a time, in order.
/// One failure never stops the remaining entries.
pub async fn reconcile_all(
    entries: &[TrackedEntry],
    source: &dyn RemoteSource,
) -> Vec<ReconciliationOutcome> {
    let mut outcomes = Vec::with_capacity(entries.len());
    for entry in entries {
        outcomes.push(reconcile(entry, source).await);
    }
    outcomes
}
