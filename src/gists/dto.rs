use serde::{Deserialize, Serialize};

use crate::gists::repo_types::Gist;

#[derive(Debug, Deserialize)]
pub struct CreateGistRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub code: String,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateGistRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GistEnvelope {
    pub gist: Gist,
}

#[derive(Debug, Serialize)]
pub struct GistList {
    pub gists: Vec<Gist>,
}
