use crate::utils::{CATALOG_FILE, SPECS_FOLDER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid repository '{0}', expected owner/repo")]
    InvalidRepository(String),
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(CATALOG_FILE)
}

fn default_specs_dir() -> PathBuf {
    PathBuf::from(SPECS_FOLDER)
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_web_base_url() -> String {
    "https://github.com".to_string()
}

/// Request timeout in seconds
fn default_timeout_secs() -> u64 {
    60
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_branch_prefix() -> String {
    "spec-updates".to_string()
}

/// GitHub endpoints and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,
    /// Never read from or written to the config file; comes from the environment
    #[serde(skip)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            raw_base_url: default_raw_base_url(),
            web_base_url: default_web_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where and how change requests are opened
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionConfig {
    /// `owner/repo` the change request is opened against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    /// Branch names are `{prefix}/{date}`
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Handlebars template for the change request body; built-in template when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_template_path: Option<PathBuf>,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            repository: None,
            base_branch: default_base_branch(),
            branch_prefix: default_branch_prefix(),
            labels: Vec::new(),
            body_template_path: None,
        }
    }
}

impl SubmissionConfig {
    /// Split `repository` into owner and repo
    pub fn repository_parts(&self) -> Result<Option<(String, String)>, ConfigError> {
        match &self.repository {
            None => Ok(None),
            Some(full) => match full.split_once('/') {
                Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                    Ok(Some((owner.to_string(), repo.to_string())))
                }
                _ => Err(ConfigError::InvalidRepository(full.clone())),
            },
        }
    }
}

/// Tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    #[serde(default = "default_specs_dir")]
    pub specs_dir: PathBuf,
    /// Optional JSON run report destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_path: Option<PathBuf>,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            specs_dir: default_specs_dir(),
            summary_path: None,
            github: GitHubConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

/// Read the configuration file
pub async fn read_config(config_path: &Path) -> Result<Option<TrackerConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: TrackerConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}
