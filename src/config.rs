use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// GitHub OAuth application credentials. Both values are optional so the
/// server can run without GitHub login; the auth route reports the gap.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub github: GithubConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "gist-tracker".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "gist-tracker-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let github = GithubConfig {
            client_id: std::env::var("GITHUB_CLIENT_ID").ok(),
            client_secret: std::env::var("GITHUB_CLIENT_SECRET").ok(),
        };
        Ok(Self {
            database_url,
            jwt,
            github,
        })
    }
}
