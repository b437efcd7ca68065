mod common;

use common::{
    create_test_dir, file_entry, find_entry, release_entry, rollout_entry, yaml_spec, FakeSource,
    RecordingSubmitter,
};
use spec_tracker::catalog::{read_catalog, write_catalog, Catalog};
use spec_tracker::config::TrackerConfig;
use spec_tracker::reconciliation::ErrorKind;
use spec_tracker::run::{run, EntryStatus, RunError, RunOptions, Submission};
use spec_tracker::utils::compute_hash;
use std::path::Path;
use tokio::fs;

fn test_config(root: &Path) -> TrackerConfig {
    TrackerConfig {
        catalog_path: root.join("catalog.json"),
        specs_dir: root.join("specs"),
        ..Default::default()
    }
}

async fn seed_catalog(config: &TrackerConfig) {
    let catalog = Catalog::new(vec![release_entry(), file_entry(), rollout_entry()]);
    write_catalog(&config.catalog_path, &catalog)
        .await
        .expect("Should write catalog");
}

fn seed_remote(source: &FakeSource) {
    source.set_release("acme", "billing-api", "v1.0.0");
    source.set_file("acme", "billing-api", "v1.0.0", "spec/openapi.yaml", &yaml_spec("1.0.0"));
    source.set_file("globex", "maps-openapi", "main", "openapi/maps.yaml", "openapi: 3.0.0\n");
    source.set_dir("contoso", "graph-specs", "master", "Specs/Rollouts", &["5", "6"]);
    source.set_file(
        "contoso",
        "graph-specs",
        "master",
        "Specs/Rollouts/6/openapi.yaml",
        &yaml_spec("1.6.0"),
    );
}

async fn count_dirs(path: &Path) -> usize {
    let mut count = 0;
    let mut entries = fs::read_dir(path).await.expect("Should read dir");
    while let Some(entry) = entries.next_entry().await.expect("Should read entry") {
        if entry.file_type().await.expect("Should stat").is_dir() {
            count += 1;
        }
    }
    count
}

#[tokio::test]
async fn test_run_publishes_updates_and_saves_catalog() {
    let temp_dir = create_test_dir();
    let config = test_config(temp_dir.path());
    seed_catalog(&config).await;

    let source = FakeSource::new();
    seed_remote(&source);
    let submitter = RecordingSubmitter::default();

    let report = run(
        &config,
        &RunOptions {
            branch: Some("spec-updates/test".to_string()),
            ..Default::default()
        },
        &source,
        Some(Submission {
            submitter: &submitter,
            git: None,
        }),
    )
    .await
    .expect("Run should succeed");

    // Report follows catalog order
    let statuses: Vec<EntryStatus> = report.entries.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![EntryStatus::Updated, EntryStatus::Failed, EntryStatus::Updated]
    );
    assert_eq!(report.entries[1].error_kind, Some(ErrorKind::ExtractionFailure));
    assert!(report.catalog_saved);
    assert_eq!(
        report.change_url.as_deref(),
        Some("https://github.test/acme/specs/pull/1")
    );
    assert!(report.errors.is_empty());

    // Artifacts and metadata
    let release_spec = config.specs_dir.join("acme/billing/1.0.0/openapi.yaml");
    assert_eq!(
        fs::read_to_string(&release_spec).await.unwrap(),
        yaml_spec("1.0.0")
    );
    let metadata = fs::read_to_string(config.specs_dir.join("acme/billing/1.0.0/metadata.json"))
        .await
        .unwrap();
    let metadata: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(metadata["sourceVersion"], "v1.0.0");
    assert_eq!(metadata["docsUrl"], "https://docs.acme.test/billing");
    assert_eq!(metadata["updateType"], "both");
    assert!(config
        .specs_dir
        .join("contoso/graph/rollout-6/openapi.yaml")
        .exists());

    // Catalog reflects published updates only
    let catalog = read_catalog(&config.catalog_path).await.unwrap();
    let acme = find_entry(&catalog, "acme", "billing");
    assert_eq!(acme.last_version, "v1.0.0");
    assert_eq!(acme.last_content_hash, Some(compute_hash(&yaml_spec("1.0.0"))));
    let contoso = find_entry(&catalog, "contoso", "graph");
    assert_eq!(contoso.last_version, "6");
    assert_eq!(contoso.spec_path, "Specs/Rollouts/6/openapi.yaml");
    assert_eq!(find_entry(&catalog, "globex", "maps"), &file_entry());

    // Change request
    let submitted = submitter.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].branch, "spec-updates/test");
    assert_eq!(submitted[0].base_branch, "main");
    assert_eq!(submitted[0].title, "Update API specs (2 changed, 1 failed)");
    assert!(submitted[0].body.contains("Acme Billing"));
    assert!(submitted[0].body.contains("globex/maps"));
}

#[tokio::test]
async fn test_second_run_without_remote_change_is_quiet() {
    let temp_dir = create_test_dir();
    let config = test_config(temp_dir.path());
    seed_catalog(&config).await;

    let source = FakeSource::new();
    seed_remote(&source);
    let submitter = RecordingSubmitter::default();

    run(&config, &RunOptions::default(), &source, None)
        .await
        .expect("First run should succeed");
    let catalog_after_first = read_catalog(&config.catalog_path).await.unwrap();

    let report = run(
        &config,
        &RunOptions::default(),
        &source,
        Some(Submission {
            submitter: &submitter,
            git: None,
        }),
    )
    .await
    .expect("Second run should succeed");

    assert_eq!(report.updated(), 0);
    assert_eq!(report.unchanged(), 2);
    assert!(!report.catalog_saved);
    assert!(submitter.submitted().is_empty());
    assert_eq!(
        read_catalog(&config.catalog_path).await.unwrap(),
        catalog_after_first
    );
}

#[tokio::test]
async fn test_same_rollout_content_change_overwrites_directory() {
    let temp_dir = create_test_dir();
    let config = test_config(temp_dir.path());
    seed_catalog(&config).await;

    let source = FakeSource::new();
    seed_remote(&source);
    run(&config, &RunOptions::default(), &source, None)
        .await
        .expect("First run should succeed");

    let revised = format!("{}# typo fix\n", yaml_spec("1.6.0"));
    source.set_file(
        "contoso",
        "graph-specs",
        "master",
        "Specs/Rollouts/6/openapi.yaml",
        &revised,
    );

    let report = run(&config, &RunOptions::default(), &source, None)
        .await
        .expect("Second run should succeed");

    let contoso = report
        .entries
        .iter()
        .find(|e| e.entry == "contoso/graph")
        .unwrap();
    assert_eq!(contoso.status, EntryStatus::Updated);
    assert_eq!(contoso.path.as_deref(), Some("contoso/graph/rollout-6/openapi.yaml"));

    let graph_dir = config.specs_dir.join("contoso/graph");
    assert_eq!(count_dirs(&graph_dir).await, 1);
    assert_eq!(
        fs::read_to_string(graph_dir.join("rollout-6/openapi.yaml"))
            .await
            .unwrap(),
        revised
    );
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let temp_dir = create_test_dir();
    let config = test_config(temp_dir.path());
    seed_catalog(&config).await;
    let before = fs::read_to_string(&config.catalog_path).await.unwrap();

    let source = FakeSource::new();
    seed_remote(&source);
    let submitter = RecordingSubmitter::default();

    let report = run(
        &config,
        &RunOptions {
            dry_run: true,
            ..Default::default()
        },
        &source,
        Some(Submission {
            submitter: &submitter,
            git: None,
        }),
    )
    .await
    .expect("Dry run should succeed");

    assert!(report.dry_run);
    assert_eq!(report.entries[0].status, EntryStatus::WouldUpdate);
    assert_eq!(report.updated(), 2);
    assert!(!config.specs_dir.exists());
    assert_eq!(fs::read_to_string(&config.catalog_path).await.unwrap(), before);
    assert!(submitter.submitted().is_empty());
}

#[tokio::test]
async fn test_only_filter_restricts_entries() {
    let temp_dir = create_test_dir();
    let config = test_config(temp_dir.path());
    seed_catalog(&config).await;

    let source = FakeSource::new();
    seed_remote(&source);

    let report = run(
        &config,
        &RunOptions {
            only: vec!["contoso/graph".to_string()],
            ..Default::default()
        },
        &source,
        None,
    )
    .await
    .expect("Run should succeed");

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].entry, "contoso/graph");
    assert!(!config.specs_dir.join("acme").exists());
}

#[tokio::test]
async fn test_submission_failure_keeps_artifacts_and_catalog() {
    let temp_dir = create_test_dir();
    let mut config = test_config(temp_dir.path());
    config.summary_path = Some(temp_dir.path().join("reports/summary.json"));
    seed_catalog(&config).await;

    let source = FakeSource::new();
    seed_remote(&source);
    let submitter = RecordingSubmitter::failing();

    let report = run(
        &config,
        &RunOptions::default(),
        &source,
        Some(Submission {
            submitter: &submitter,
            git: None,
        }),
    )
    .await
    .expect("Run should still succeed");

    assert!(report.change_url.is_none());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("submission failed"));
    assert!(report.catalog_saved);
    assert!(config
        .specs_dir
        .join("acme/billing/1.0.0/openapi.yaml")
        .exists());

    let summary = fs::read_to_string(temp_dir.path().join("reports/summary.json"))
        .await
        .expect("Summary should be written");
    let summary: serde_json::Value = serde_json::from_str(&summary).unwrap();
    assert_eq!(summary["entries"][1]["errorKind"], "extraction-failure");
    assert_eq!(summary["catalogSaved"], true);
}

#[tokio::test]
async fn test_persist_failure_leaves_entry_unmutated() {
    let temp_dir = create_test_dir();
    let config = test_config(temp_dir.path());
    seed_catalog(&config).await;

    // A file where the specs directory should be makes every write fail
    fs::write(&config.specs_dir, "not a directory").await.unwrap();

    let source = FakeSource::new();
    seed_remote(&source);

    let report = run(&config, &RunOptions::default(), &source, None)
        .await
        .expect("Run should succeed");

    assert_eq!(report.entries[0].status, EntryStatus::Failed);
    assert_eq!(report.entries[0].error_kind, Some(ErrorKind::PersistFailure));
    assert!(!report.catalog_saved);

    let catalog = read_catalog(&config.catalog_path).await.unwrap();
    assert_eq!(find_entry(&catalog, "acme", "billing"), &release_entry());
}

#[tokio::test]
async fn test_missing_catalog_is_an_error() {
    let temp_dir = create_test_dir();
    let config = test_config(temp_dir.path());

    let result = run(&config, &RunOptions::default(), &FakeSource::new(), None).await;
    assert!(matches!(result, Err(RunError::CatalogError(_))));
}
