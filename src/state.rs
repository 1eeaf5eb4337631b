use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::auth::github::{GithubIdentity, GithubOAuth};
use crate::config::AppConfig;
use crate::explore::client::{GistFeed, GithubGists};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub github: Arc<dyn GithubIdentity>,
    pub feed: Arc<dyn GistFeed>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("invalid DATABASE_URL")?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("failed to connect to database")?;

        let github = Arc::new(GithubOAuth::new(&config.github)) as Arc<dyn GithubIdentity>;
        let feed = Arc::new(GithubGists::new()) as Arc<dyn GistFeed>;

        Ok(Self {
            db,
            config,
            github,
            feed,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        github: Arc<dyn GithubIdentity>,
        feed: Arc<dyn GistFeed>,
    ) -> Self {
        Self {
            db,
            config,
            github,
            feed,
        }
    }
}
