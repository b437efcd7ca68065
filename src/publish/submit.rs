use crate::config::GitHubConfig;
use crate::remote::build_client;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SubmitError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Opens a reviewable change request for a pushed branch.
#[async_trait]
pub trait ChangeSubmitter: Send + Sync {
    /// Open (or refresh) a change request and return its URL
    async fn submit_change(
        &self,
        branch: &str,
        base_branch: &str,
        title: &str,
        body: &str,
    ) -> Result<String, SubmitError>;
}

#[derive(Debug, Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdatePullRequest<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct AddLabels<'a> {
    labels: &'a [String],
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    number: u64,
    html_url: String,
}

/// Pull requests on a GitHub repository
#[derive(Debug, Clone)]
pub struct GitHubSubmitter {
    client: Client,
    api_base_url: String,
    owner: String,
    repo: String,
    labels: Vec<String>,
}

impl GitHubSubmitter {
    pub fn new(
        config: &GitHubConfig,
        owner: impl Into<String>,
        repo: impl Into<String>,
        labels: Vec<String>,
    ) -> Result<Self, SubmitError> {
        let client = build_client(config.token.as_deref(), config.timeout_secs)
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            labels,
        })
    }

    fn pulls_url(&self) -> String {
        format!("{}/repos/{}/{}/pulls", self.api_base_url, self.owner, self.repo)
    }

    async fn parse_pull(response: reqwest::Response) -> Result<PullRequest, SubmitError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SubmitError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<PullRequest>()
            .await
            .map_err(|e| SubmitError::Parse(e.to_string()))
    }

    async fn find_open_pull(&self, branch: &str) -> Result<Option<PullRequest>, SubmitError> {
        let head = format!("{}:{}", self.owner, branch);
        let response = self
            .client
            .get(self.pulls_url())
            .query(&[("head", head.as_str()), ("state", "open")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let pulls: Vec<PullRequest> = response
            .json()
            .await
            .map_err(|e| SubmitError::Parse(e.to_string()))?;
        Ok(pulls.into_iter().next())
    }

    async fn add_labels(&self, number: u64) -> Result<(), SubmitError> {
        if self.labels.is_empty() {
            return Ok(());
        }

        let url = format!(
            "{}/repos/{}/{}/issues/{}/labels",
            self.api_base_url, self.owner, self.repo, number
        );
        let response = self
            .client
            .post(url)
            .json(&AddLabels {
                labels: &self.labels,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeSubmitter for GitHubSubmitter {
    async fn submit_change(
        &self,
        branch: &str,
        base_branch: &str,
        title: &str,
        body: &str,
    ) -> Result<String, SubmitError> {
        let response = self
            .client
            .post(self.pulls_url())
            .json(&CreatePullRequest {
                title,
                head: branch,
                base: base_branch,
                body,
            })
            .send()
            .await?;

        // 422 means a pull request for this branch already exists
        let pull = if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let existing = self.find_open_pull(branch).await?.ok_or_else(|| {
                SubmitError::Api {
                    status: 422,
                    message: format!("could not open a pull request for {}", branch),
                }
            })?;

            let response = self
                .client
                .patch(format!("{}/{}", self.pulls_url(), existing.number))
                .json(&UpdatePullRequest { title, body })
                .send()
                .await?;
            let pull = Self::parse_pull(response).await?;
            info!(number = pull.number, url = %pull.html_url, "Updated pull request");
            pull
        } else {
            let pull = Self::parse_pull(response).await?;
            info!(number = pull.number, url = %pull.html_url, "Opened pull request");
            pull
        };

        if let Err(e) = self.add_labels(pull.number).await {
            warn!(number = pull.number, error = %e, "Failed to label pull request");
        }

        Ok(pull.html_url)
    }
}
