use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;

use super::dto::PublicGist;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "gist-tracker";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("github returned status {0}")]
    Status(StatusCode),
    #[error("feed request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Upstream source of the public gist feed. The route decides what an
/// unavailable feed looks like to clients; this client only reports it.
#[async_trait]
pub trait GistFeed: Send + Sync {
    async fn public_gists(&self, page: u32, per_page: u32) -> Result<Vec<PublicGist>, FeedError>;
}

pub struct GithubGists {
    http: Client,
    base_url: String,
}

impl GithubGists {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: API_BASE.into(),
        }
    }
}

impl Default for GithubGists {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GistFeed for GithubGists {
    async fn public_gists(&self, page: u32, per_page: u32) -> Result<Vec<PublicGist>, FeedError> {
        let response = self
            .http
            .get(format!("{}/gists/public", self.base_url))
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        Ok(response.json().await?)
    }
}
