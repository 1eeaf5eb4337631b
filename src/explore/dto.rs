use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::filter::SearchField;

/// One gist from the public GitHub feed, reduced to the fields the UI shows.
/// Unknown upstream fields are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicGist {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    /// Missing for anonymous gists.
    #[serde(default)]
    pub owner: Option<FeedOwner>,
    #[serde(default)]
    pub files: HashMap<String, FeedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedFile {
    pub filename: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Optional search text applied after the fetch.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub field: SearchField,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_feed_entry() {
        let raw = r#"
        {
            "id": "aa5a315d61ae9438b18d",
            "description": "Hello World Examples",
            "html_url": "https://gist.github.com/aa5a315d61ae9438b18d",
            "owner": {"login": "octocat", "avatar_url": "https://github.com/images/error/octocat_happy.gif", "site_admin": false},
            "files": {"hello_world.rb": {"filename": "hello_world.rb", "language": "Ruby", "size": 167}},
            "truncated": false
        }
        "#;
        let gist: PublicGist = serde_json::from_str(raw).unwrap();
        assert_eq!(gist.id, "aa5a315d61ae9438b18d");
        assert_eq!(gist.owner.unwrap().login, "octocat");
        assert_eq!(
            gist.files["hello_world.rb"].language.as_deref(),
            Some("Ruby")
        );
    }

    #[test]
    fn tolerates_null_description_and_missing_owner() {
        let raw = r#"
        {
            "id": "deadbeef",
            "description": null,
            "html_url": "https://gist.github.com/deadbeef",
            "files": {"notes.txt": {"filename": "notes.txt", "language": null}}
        }
        "#;
        let gist: PublicGist = serde_json::from_str(raw).unwrap();
        assert!(gist.description.is_none());
        assert!(gist.owner.is_none());
        assert!(gist.files["notes.txt"].language.is_none());
    }
}
