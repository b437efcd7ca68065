//! One full tracker run: catalog in, specs and change request out.

mod types;

pub use types::{EntryReport, EntryStatus, RunOptions, RunReport};

use crate::catalog::{read_catalog, write_catalog, CatalogError, TrackedEntry};
use crate::config::TrackerConfig;
use crate::publish::{persist_artifact, ChangeSubmitter, GitWorkspace};
use crate::reconciliation::{reconcile_all, ReconcileError, ReconciliationOutcome, UpdateResult};
use crate::remote::RemoteSource;
use crate::template::{ChangeContext, ChangeItem, FailureItem, TemplateEngine, TemplateError};
use crate::utils::{now_iso, today};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),
}

/// How published updates are proposed for review
pub struct Submission<'a> {
    pub submitter: &'a dyn ChangeSubmitter,
    /// Commit and push before submitting; `None` when the branch is pushed elsewhere
    pub git: Option<&'a GitWorkspace>,
}

/// Reconcile every selected catalog entry, publish updates, save the
/// catalog, and open a change request.
///
/// Per-entry failures are recorded in the report and never stop the run.
/// Failures after artifacts are written (catalog save, git, submission)
/// are reported but do not undo the written files.
pub async fn run(
    config: &TrackerConfig,
    options: &RunOptions,
    source: &dyn RemoteSource,
    submission: Option<Submission<'_>>,
) -> Result<RunReport, RunError> {
    let started_at = now_iso();
    let mut catalog = read_catalog(&config.catalog_path).await?;

    let selected: Vec<usize> = catalog
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| options.only.is_empty() || options.only.contains(&e.key()))
        .map(|(i, _)| i)
        .collect();

    info!(
        total = catalog.entries.len(),
        selected = selected.len(),
        dry_run = options.dry_run,
        "Starting run"
    );

    let entries: Vec<TrackedEntry> = selected
        .iter()
        .map(|&i| catalog.entries[i].clone())
        .collect();
    let outcomes = reconcile_all(&entries, source).await;

    let mut report = RunReport {
        started_at,
        finished_at: String::new(),
        dry_run: options.dry_run,
        entries: Vec::with_capacity(outcomes.len()),
        catalog_saved: false,
        change_url: None,
        errors: Vec::new(),
    };
    let mut published: Vec<ChangeItem> = Vec::new();
    let mut failures: Vec<FailureItem> = Vec::new();

    for (&index, outcome) in selected.iter().zip(outcomes) {
        let entry = &mut catalog.entries[index];

        let line = match outcome {
            ReconciliationOutcome::NoChange => EntryReport::new(entry.key(), EntryStatus::NoChange),
            ReconciliationOutcome::Failed(e) => {
                failures.push(failure_item(entry, &e));
                failed_line(entry, &e)
            }
            ReconciliationOutcome::Update(update) if options.dry_run => {
                update_line(entry, &update, EntryStatus::WouldUpdate)
            }
            ReconciliationOutcome::Update(update) => {
                match persist_artifact(&config.specs_dir, entry, &update).await {
                    Ok(_) => {
                        entry.apply_state(&update.next_state);
                        published.push(ChangeItem::from(&*update));
                        update_line(entry, &update, EntryStatus::Updated)
                    }
                    Err(e) => {
                        let e = ReconcileError::Persist(e.to_string());
                        error!(entry = %entry.key(), error = %e, "Failed to persist spec");
                        failures.push(failure_item(entry, &e));
                        failed_line(entry, &e)
                    }
                }
            }
        };

        report.entries.push(line);
    }

    if !published.is_empty() {
        catalog.updated_at = now_iso();
        match write_catalog(&config.catalog_path, &catalog).await {
            Ok(()) => report.catalog_saved = true,
            Err(e) => {
                error!(error = %e, "Failed to save catalog");
                report.errors.push(format!("catalog save failed: {}", e));
            }
        }

        if let Some(submission) = submission {
            let context = ChangeContext::new(published, failures);
            submit(config, options, &context, submission, &mut report).await;
        }
    }

    report.finished_at = now_iso();

    info!(
        updated = report.updated(),
        unchanged = report.unchanged(),
        failed = report.failed(),
        "Run finished"
    );

    if let Some(summary_path) = &config.summary_path {
        if let Err(e) = write_report(summary_path, &report).await {
            warn!(path = %summary_path.display(), error = %e, "Failed to write run report");
        }
    }

    Ok(report)
}

async fn submit(
    config: &TrackerConfig,
    options: &RunOptions,
    context: &ChangeContext,
    submission: Submission<'_>,
    report: &mut RunReport,
) {
    let mut engine = TemplateEngine::new();
    if let Some(template_path) = &config.submission.body_template_path {
        if let Err(e) = engine.load_body_template(template_path).await {
            warn!(error = %e, "Falling back to the built-in change request template");
        }
    }

    let (title, body) = match render_change(&engine, context) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!(error = %e, "Failed to render change request");
            report.errors.push(format!("render failed: {}", e));
            return;
        }
    };

    let branch = options
        .branch
        .clone()
        .unwrap_or_else(|| format!("{}/{}", config.submission.branch_prefix, today()));

    if let Some(git) = submission.git {
        let paths = [config.specs_dir.as_path(), config.catalog_path.as_path()];
        match git.commit_and_push(&branch, &paths, &title).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                error!(branch = %branch, error = %e, "Failed to push branch");
                report.errors.push(format!("git failed: {}", e));
                return;
            }
        }
    }

    match submission
        .submitter
        .submit_change(&branch, &config.submission.base_branch, &title, &body)
        .await
    {
        Ok(url) => report.change_url = Some(url),
        Err(e) => {
            error!(branch = %branch, error = %e, "Failed to submit change");
            report.errors.push(format!("submission failed: {}", e));
        }
    }
}

fn render_change(
    engine: &TemplateEngine,
    context: &ChangeContext,
) -> Result<(String, String), TemplateError> {
    Ok((engine.render_title(context)?, engine.render_body(context)?))
}

fn update_line(entry: &TrackedEntry, update: &UpdateResult, status: EntryStatus) -> EntryReport {
    EntryReport {
        update_type: Some(update.update_type),
        old_version: Some(update.old_version.clone()),
        new_version: Some(update.new_version.clone()),
        api_version: Some(update.api_version.clone()),
        path: Some(format!("{}{}", update.local_path, update.file_name)),
        ..EntryReport::new(entry.key(), status)
    }
}

fn failed_line(entry: &TrackedEntry, error: &ReconcileError) -> EntryReport {
    EntryReport {
        error_kind: Some(error.kind()),
        error: Some(error.to_string()),
        ..EntryReport::new(entry.key(), EntryStatus::Failed)
    }
}

fn failure_item(entry: &TrackedEntry, error: &ReconcileError) -> FailureItem {
    FailureItem {
        entry: entry.key(),
        kind: error.kind(),
        reason: error.to_string(),
    }
}

async fn write_report(path: &Path, report: &RunReport) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let content = serde_json::to_string_pretty(report)?;
    fs::write(path, content).await
}
