use super::types::{ContentEntry, FetchedArtifact, ReleaseInfo};
use super::{RemoteError, RemoteSource};
use crate::config::GitHubConfig;
use crate::utils::TRACKER_VERSION;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::debug;

/// [`RemoteSource`] backed by the GitHub REST API and raw content host.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: Client,
    api_base_url: String,
    raw_base_url: String,
    web_base_url: String,
}

impl GitHubSource {
    pub fn new(config: &GitHubConfig) -> Result<Self, RemoteError> {
        let client = build_client(config.token.as_deref(), config.timeout_secs)?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            raw_base_url: config.raw_base_url.trim_end_matches('/').to_string(),
            web_base_url: config.web_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: Url) -> Result<Response, RemoteError> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::from_status(status.as_u16(), url.as_str()));
        }

        Ok(response)
    }

    async fn get_text(&self, url: Url) -> Result<FetchedArtifact, RemoteError> {
        let content = self
            .get(url.clone())
            .await?
            .text()
            .await
            .map_err(|e| RemoteError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(FetchedArtifact {
            content,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl RemoteSource for GitHubSource {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<ReleaseInfo, RemoteError> {
        let url = endpoint(
            &self.api_base_url,
            ["repos", owner, repo, "releases", "latest"],
        )?;

        self.get(url.clone())
            .await?
            .json::<ReleaseInfo>()
            .await
            .map_err(|e| RemoteError::Transport {
                url: url.to_string(),
                message: format!("invalid release payload: {}", e),
            })
    }

    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Vec<String>, RemoteError> {
        let mut url = endpoint(
            &self.api_base_url,
            ["repos", owner, repo, "contents"]
                .into_iter()
                .chain(path_segments(path)),
        )?;
        url.query_pairs_mut().append_pair("ref", branch);

        let entries = self
            .get(url.clone())
            .await?
            .json::<Vec<ContentEntry>>()
            .await
            .map_err(|e| RemoteError::Transport {
                url: url.to_string(),
                message: format!("invalid directory listing: {}", e),
            })?;

        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<FetchedArtifact, RemoteError> {
        let url = endpoint(
            &self.raw_base_url,
            [owner, repo]
                .into_iter()
                .chain(path_segments(git_ref))
                .chain(path_segments(path)),
        )?;
        self.get_text(url).await
    }

    async fn fetch_release_asset(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
        asset_name: &str,
    ) -> Result<FetchedArtifact, RemoteError> {
        let url = endpoint(
            &self.web_base_url,
            [owner, repo, "releases", "download", tag, asset_name],
        )?;
        self.get_text(url).await
    }
}

/// Non-empty `/`-separated segments of a repository path or ref
fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// `base` with each segment appended percent-encoded
fn endpoint<'a, I>(base: &str, segments: I) -> Result<Url, RemoteError>
where
    I: IntoIterator<Item = &'a str>,
{
    let invalid = |message: String| RemoteError::Transport {
        url: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(format!("invalid base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| invalid("base URL cannot take a path".to_string()))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// HTTP client with the headers GitHub expects
pub(crate) fn build_client(token: Option<&str>, timeout_secs: u64) -> Result<Client, RemoteError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim())).map_err(|e| {
            RemoteError::Transport {
                url: String::new(),
                message: format!("invalid token: {}", e),
            }
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    let user_agent = format!("spec-tracker/{}", TRACKER_VERSION);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent).map_err(|e| RemoteError::Transport {
            url: String::new(),
            message: e.to_string(),
        })?,
    );

    Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RemoteError::Transport {
            url: String::new(),
            message: format!("http client build failed: {}", e),
        })
}
