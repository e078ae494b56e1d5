use crate::core::{Commit, Repository, RepositoryHost};
use crate::utils::error::{GemailsError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// GitHub REST client. Reads a single page of every listing.
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            GemailsError::InvalidConfigValueError {
                field: "token".to_string(),
                value: "<redacted>".to_string(),
                reason: "Token contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `Ok(None)` on 409 Conflict, which GitHub returns e.g. for empty repositories.
    async fn get(&self, url: &str) -> Result<Option<String>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::CONFLICT {
            tracing::warn!("409 Conflict encountered for URL: {}. Skipping.", url);
            return Ok(None);
        }
        if status != StatusCode::OK {
            return Err(GemailsError::StatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn list_repositories(&self, account: &str) -> Result<Vec<Repository>> {
        let url = format!("{}/users/{}/repos", self.base_url, account);
        let Some(body) = self.get(&url).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&body).map_err(|source| GemailsError::DecodeError {
            context: format!("repositories of {}", account),
            source,
        })
    }

    async fn list_commits(&self, account: &str, repository: &str) -> Result<Vec<Commit>> {
        let url = format!("{}/repos/{}/{}/commits", self.base_url, account, repository);
        let Some(body) = self.get(&url).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&body) {
            Ok(commits) => Ok(commits),
            Err(e) => {
                tracing::warn!("Error decoding commits for repo {}: {}", repository, e);
                Ok(Vec::new())
            }
        }
    }
}
