use axum::{extract::State, routing::get, Json, Router};
use tracing::{instrument, warn};

use crate::extract::ApiQuery;
use crate::state::AppState;

use super::dto::{FeedQuery, PublicGist};
use super::filter;

pub fn feed_routes() -> Router<AppState> {
    Router::new().route("/gists/public", get(explore_gists))
}

/// Browse the public GitHub gist feed. An unreachable upstream degrades to
/// an empty page instead of an error so the explore view always renders.
#[instrument(skip(state))]
pub async fn explore_gists(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FeedQuery>,
) -> Json<Vec<PublicGist>> {
    let page = params.page.max(1);
    let per_page = params.per_page.clamp(1, 100);

    let gists = match state.feed.public_gists(page, per_page).await {
        Ok(gists) => gists,
        Err(err) => {
            warn!(error = %err, page, per_page, "public gist feed unavailable, serving an empty page");
            Vec::new()
        }
    };

    let gists = match params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => gists
            .into_iter()
            .filter(|gist| filter::matches(gist, params.field, query))
            .collect(),
        None => gists,
    };

    Json(gists)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::app::test_helpers::{build_test_app, send_get};
    use crate::explore::dto::{FeedFile, FeedOwner, PublicGist};
    use crate::state::test_support::{test_state, DownFeed, StaticFeed};

    fn feed_entry(id: &str, login: &str, language: &str) -> PublicGist {
        let mut files = HashMap::new();
        files.insert(
            format!("{id}.txt"),
            FeedFile {
                filename: format!("{id}.txt"),
                language: Some(language.into()),
            },
        );
        PublicGist {
            id: id.into(),
            description: Some(format!("snippet {id}")),
            html_url: format!("https://gist.github.com/{id}"),
            owner: Some(FeedOwner {
                login: login.into(),
                avatar_url: String::new(),
            }),
            files,
        }
    }

    #[tokio::test]
    async fn serves_the_upstream_page() {
        let mut state = test_state().await;
        state.feed = Arc::new(StaticFeed(vec![
            feed_entry("a", "octocat", "Rust"),
            feed_entry("b", "hubot", "Python"),
        ]));
        let app = build_test_app(state);

        let (status, body) = send_get(&app, "/api/gists/public", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["owner"]["login"], "octocat");
    }

    #[tokio::test]
    async fn filters_by_language() {
        let mut state = test_state().await;
        state.feed = Arc::new(StaticFeed(vec![
            feed_entry("a", "octocat", "Rust"),
            feed_entry("b", "hubot", "Python"),
        ]));
        let app = build_test_app(state);

        let (status, body) =
            send_get(&app, "/api/gists/public?q=rust&field=language", None).await;
        assert_eq!(status, StatusCode::OK);
        let page = body.as_array().unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["id"], "a");
    }

    #[tokio::test]
    async fn blank_query_is_ignored() {
        let mut state = test_state().await;
        state.feed = Arc::new(StaticFeed(vec![feed_entry("a", "octocat", "Rust")]));
        let app = build_test_app(state);

        let (status, body) = send_get(&app, "/api/gists/public?q=%20%20", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unavailable_feed_degrades_to_empty_page() {
        let mut state = test_state().await;
        state.feed = Arc::new(DownFeed);
        let app = build_test_app(state);

        let (status, body) = send_get(&app, "/api/gists/public", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}
