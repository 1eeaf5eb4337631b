use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::GithubConfig;
use crate::error::ApiError;

const OAUTH_BASE: &str = "https://github.com";
const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "gist-tracker";

/// Identity resolved from a GitHub authorization code.
#[derive(Debug, Clone)]
pub struct GithubProfile {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("github oauth is not configured")]
    NotConfigured,
    #[error("github rejected the authorization code: {0}")]
    Rejected(String),
    #[error("github returned status {0}")]
    Api(StatusCode),
    #[error("github account has no accessible email address")]
    MissingEmail,
    #[error("github request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<GithubError> for ApiError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::NotConfigured => {
                ApiError::Internal(anyhow::anyhow!("github oauth is not configured"))
            }
            GithubError::Rejected(reason) => {
                ApiError::Unauthorized(format!("GitHub rejected the authorization: {reason}"))
            }
            GithubError::MissingEmail => {
                ApiError::Unauthorized("GitHub account has no accessible email address".into())
            }
            GithubError::Api(status) => {
                ApiError::Upstream(format!("GitHub returned status {status}"))
            }
            GithubError::Network(err) => ApiError::Upstream(format!("GitHub is unreachable: {err}")),
        }
    }
}

/// Seam for the OAuth dance so handlers can be exercised without GitHub.
#[async_trait]
pub trait GithubIdentity: Send + Sync {
    async fn authenticate(&self, code: &str) -> Result<GithubProfile, GithubError>;
}

pub struct GithubOAuth {
    http: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

impl GithubOAuth {
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            http: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<String, GithubError> {
        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id.as_str(), secret.as_str()),
            _ => return Err(GithubError::NotConfigured),
        };

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
        ];
        let response = self
            .http
            .post(format!("{OAUTH_BASE}/login/oauth/access_token"))
            .header(header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Api(status));
        }

        // GitHub reports a bad code inside a 200 body, not via the status.
        let body: AccessTokenResponse = response.json().await?;
        match body.access_token {
            Some(token) => Ok(token),
            None => Err(GithubError::Rejected(
                body.error_description
                    .or(body.error)
                    .unwrap_or_else(|| "no access token in response".into()),
            )),
        }
    }

    async fn fetch_user(&self, token: &str) -> Result<GithubUser, GithubError> {
        let response = self
            .http
            .get(format!("{API_BASE}/user"))
            .bearer_auth(token)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(GithubError::Rejected("access token was not accepted".into()));
        }
        if !status.is_success() {
            return Err(GithubError::Api(status));
        }
        Ok(response.json().await?)
    }

    async fn fetch_primary_email(&self, token: &str) -> Result<Option<String>, GithubError> {
        let response = self
            .http
            .get(format!("{API_BASE}/user/emails"))
            .bearer_auth(token)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        // Tokens without the email scope get a 403 here; treat as no email.
        if !response.status().is_success() {
            return Ok(None);
        }
        let emails: Vec<GithubEmail> = response.json().await?;
        Ok(emails
            .iter()
            .find(|e| e.primary && e.verified)
            .or_else(|| emails.first())
            .map(|e| e.email.clone()))
    }
}

#[async_trait]
impl GithubIdentity for GithubOAuth {
    async fn authenticate(&self, code: &str) -> Result<GithubProfile, GithubError> {
        let token = self.exchange_code(code).await?;
        let user = self.fetch_user(&token).await?;
        debug!(github_id = user.id, login = %user.login, "github user fetched");

        let email = match user.email {
            Some(email) => email,
            None => self
                .fetch_primary_email(&token)
                .await?
                .ok_or(GithubError::MissingEmail)?,
        };

        Ok(GithubProfile {
            id: user.id,
            login: user.login,
            name: user.name,
            email,
        })
    }
}
