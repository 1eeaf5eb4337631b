use serde::Deserialize;

use super::dto::PublicGist;

/// Which part of a feed entry a search query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Any,
    Description,
    Filetype,
    Language,
    Author,
}

/// Case-insensitive substring match of `query` against the chosen field.
/// A description search also matches the author, mirroring how people
/// scan the feed for "that gist by someone".
pub fn matches(gist: &PublicGist, field: SearchField, query: &str) -> bool {
    let query = query.to_lowercase();

    let description_hit = gist
        .description
        .as_deref()
        .map(|d| d.to_lowercase().contains(&query))
        .unwrap_or(false);
    let author_hit = gist
        .owner
        .as_ref()
        .map(|o| o.login.to_lowercase().contains(&query))
        .unwrap_or(false);
    let filename_hit = || {
        gist.files
            .values()
            .any(|f| f.filename.to_lowercase().contains(&query))
    };
    let language_hit = || {
        gist.files.values().any(|f| {
            f.language
                .as_deref()
                .map(|l| l.to_lowercase().contains(&query))
                .unwrap_or(false)
        })
    };

    match field {
        SearchField::Description => description_hit || author_hit,
        SearchField::Filetype => filename_hit(),
        SearchField::Language => language_hit(),
        SearchField::Author => author_hit,
        SearchField::Any => description_hit || author_hit || filename_hit() || language_hit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::dto::{FeedFile, FeedOwner};
    use std::collections::HashMap;

    fn sample() -> PublicGist {
        let mut files = HashMap::new();
        files.insert(
            "main.rs".to_string(),
            FeedFile {
                filename: "main.rs".into(),
                language: Some("Rust".into()),
            },
        );
        PublicGist {
            id: "1".into(),
            description: Some("Tokio retry helper".into()),
            html_url: "https://gist.github.com/1".into(),
            owner: Some(FeedOwner {
                login: "ferris".into(),
                avatar_url: String::new(),
            }),
            files,
        }
    }

    #[test]
    fn matches_are_case_insensitive() {
        let gist = sample();
        assert!(matches(&gist, SearchField::Language, "rust"));
        assert!(matches(&gist, SearchField::Language, "RUST"));
        assert!(matches(&gist, SearchField::Author, "Ferris"));
    }

    #[test]
    fn description_search_also_matches_author() {
        let gist = sample();
        assert!(matches(&gist, SearchField::Description, "retry"));
        assert!(matches(&gist, SearchField::Description, "ferris"));
        assert!(!matches(&gist, SearchField::Description, "python"));
    }

    #[test]
    fn filetype_looks_at_filenames_only() {
        let gist = sample();
        assert!(matches(&gist, SearchField::Filetype, ".rs"));
        assert!(!matches(&gist, SearchField::Filetype, "ferris"));
    }

    #[test]
    fn any_field_matches_everything_it_can() {
        let gist = sample();
        for query in ["tokio", "ferris", "main.rs", "rust"] {
            assert!(matches(&gist, SearchField::Any, query), "query {query}");
        }
        assert!(!matches(&gist, SearchField::Any, "haskell"));
    }

    #[test]
    fn missing_fields_never_match() {
        let gist = PublicGist {
            id: "2".into(),
            description: None,
            html_url: "https://gist.github.com/2".into(),
            owner: None,
            files: HashMap::new(),
        };
        assert!(!matches(&gist, SearchField::Any, "anything"));
        assert!(!matches(&gist, SearchField::Author, "anything"));
    }
}
