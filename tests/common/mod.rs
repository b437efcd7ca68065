#![allow(dead_code)]

use async_trait::async_trait;
use spec_tracker::publish::{ChangeSubmitter, SubmitError};
use spec_tracker::remote::{FetchedArtifact, ReleaseAsset, ReleaseInfo, RemoteError, RemoteSource};
use spec_tracker::{Catalog, TrackedEntry, VersioningStrategy};
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// In-memory remote host. Missing releases, files and directories are 404s.
#[derive(Default)]
pub struct FakeSource {
    releases: Mutex<HashMap<String, Result<ReleaseInfo, RemoteError>>>,
    files: Mutex<HashMap<String, String>>,
    assets: Mutex<HashMap<String, String>>,
    dirs: Mutex<HashMap<String, Vec<String>>>,
    fetches: Mutex<Vec<String>>,
    listings: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_release(&self, owner: &str, repo: &str, tag: &str) {
        self.set_release_info(owner, repo, release(tag, false, false, &[]));
    }

    pub fn set_release_info(&self, owner: &str, repo: &str, info: ReleaseInfo) {
        self.releases
            .lock()
            .unwrap()
            .insert(format!("{}/{}", owner, repo), Ok(info));
    }

    pub fn set_release_error(&self, owner: &str, repo: &str, error: RemoteError) {
        self.releases
            .lock()
            .unwrap()
            .insert(format!("{}/{}", owner, repo), Err(error));
    }

    pub fn set_file(&self, owner: &str, repo: &str, git_ref: &str, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(file_url(owner, repo, git_ref, path), content.to_string());
    }

    pub fn set_asset(&self, owner: &str, repo: &str, tag: &str, name: &str, content: &str) {
        self.assets
            .lock()
            .unwrap()
            .insert(asset_url(owner, repo, tag, name), content.to_string());
    }

    pub fn set_dir(&self, owner: &str, repo: &str, branch: &str, path: &str, names: &[&str]) {
        self.dirs.lock().unwrap().insert(
            format!("{}/{}@{}:{}", owner, repo, branch, path),
            names.iter().map(|n| n.to_string()).collect(),
        );
    }

    /// URLs fetched so far, in order
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn listings(&self) -> Vec<String> {
        self.listings.lock().unwrap().clone()
    }
}

/// Catalog entry by vendor and api id
pub fn find_entry<'a>(catalog: &'a Catalog, vendor: &str, api: &str) -> &'a TrackedEntry {
    catalog
        .entries
        .iter()
        .find(|e| e.vendor == vendor && e.api == api)
        .unwrap_or_else(|| panic!("no catalog entry {}/{}", vendor, api))
}

pub fn file_url(owner: &str, repo: &str, git_ref: &str, path: &str) -> String {
    format!("https://raw.test/{}/{}/{}/{}", owner, repo, git_ref, path)
}

pub fn asset_url(owner: &str, repo: &str, tag: &str, name: &str) -> String {
    format!("https://web.test/{}/{}/releases/download/{}/{}", owner, repo, tag, name)
}

pub fn release(tag: &str, draft: bool, prerelease: bool, assets: &[&str]) -> ReleaseInfo {
    ReleaseInfo {
        tag: tag.to_string(),
        is_draft: draft,
        is_prerelease: prerelease,
        assets: assets
            .iter()
            .map(|name| ReleaseAsset {
                name: name.to_string(),
            })
            .collect(),
    }
}

#[async_trait]
impl RemoteSource for FakeSource {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<ReleaseInfo, RemoteError> {
        let key = format!("{}/{}", owner, repo);
        self.releases
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::NotFound(key)))
    }

    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Vec<String>, RemoteError> {
        let key = format!("{}/{}@{}:{}", owner, repo, branch, path);
        self.listings.lock().unwrap().push(key.clone());
        self.dirs
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(RemoteError::NotFound(key))
    }

    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<FetchedArtifact, RemoteError> {
        let url = file_url(owner, repo, git_ref, path);
        self.fetches.lock().unwrap().push(url.clone());
        match self.files.lock().unwrap().get(&url) {
            Some(content) => Ok(FetchedArtifact {
                content: content.clone(),
                url,
            }),
            None => Err(RemoteError::NotFound(url)),
        }
    }

    async fn fetch_release_asset(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        asset_name: &str,
    ) -> Result<FetchedArtifact, RemoteError> {
        let url = asset_url(owner, repo, tag, asset_name);
        self.fetches.lock().unwrap().push(url.clone());
        match self.assets.lock().unwrap().get(&url) {
            Some(content) => Ok(FetchedArtifact {
                content: content.clone(),
                url,
            }),
            None => Err(RemoteError::NotFound(url)),
        }
    }
}

/// A submitted change request
#[derive(Debug, Clone)]
pub struct Submitted {
    pub branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

/// Records change requests instead of opening them
#[derive(Default)]
pub struct RecordingSubmitter {
    pub submitted: Mutex<Vec<Submitted>>,
    pub fail: bool,
}

impl RecordingSubmitter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChangeSubmitter for RecordingSubmitter {
    async fn submit_change(
        &self,
        branch: &str,
        base_branch: &str,
        title: &str,
        body: &str,
    ) -> Result<String, SubmitError> {
        if self.fail {
            return Err(SubmitError::Api {
                status: 403,
                message: "Resource not accessible by integration".to_string(),
            });
        }

        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(Submitted {
            branch: branch.to_string(),
            base_branch: base_branch.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(format!("https://github.test/acme/specs/pull/{}", submitted.len()))
    }
}

pub fn release_entry() -> TrackedEntry {
    TrackedEntry {
        vendor: "acme".to_string(),
        api: "billing".to_string(),
        owner: "acme".to_string(),
        repo: "billing-api".to_string(),
        name: "Acme Billing".to_string(),
        spec_path: "spec/openapi.yaml".to_string(),
        release_asset_name: "openapi.json".to_string(),
        versioning_strategy: VersioningStrategy::ReleaseTag,
        description: "Billing and invoicing".to_string(),
        docs_url: "https://docs.acme.test/billing".to_string(),
        tags: vec!["payments".to_string()],
        ..Default::default()
    }
}

pub fn file_entry() -> TrackedEntry {
    TrackedEntry {
        vendor: "globex".to_string(),
        api: "maps".to_string(),
        owner: "globex".to_string(),
        repo: "maps-openapi".to_string(),
        name: "Globex Maps".to_string(),
        spec_path: "openapi/maps.yaml".to_string(),
        versioning_strategy: VersioningStrategy::FileBased,
        ..Default::default()
    }
}

pub fn rollout_entry() -> TrackedEntry {
    TrackedEntry {
        vendor: "contoso".to_string(),
        api: "graph".to_string(),
        owner: "contoso".to_string(),
        repo: "graph-specs".to_string(),
        name: "Contoso Graph".to_string(),
        last_version: "5".to_string(),
        spec_path: "Specs/Rollouts/5/openapi.yaml".to_string(),
        versioning_strategy: VersioningStrategy::RolloutBased,
        ..Default::default()
    }
}

pub fn yaml_spec(version: &str) -> String {
    format!(
        "openapi: 3.0.1\ninfo:\n  title: Test API\n  version: {}\npaths: {{}}\n",
        version
    )
}
