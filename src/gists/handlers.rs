use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, Message},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

use super::dto::{CreateGistRequest, GistEnvelope, GistList, UpdateGistRequest};
use super::repo_types::Gist;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/gists/user", get(list_user_gists))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/gists/create", post(create_gist))
        .route("/gists/update/:id", put(update_gist))
        .route("/gists/delete/:id", delete(delete_gist))
}

/// Canonical title form: trimmed, every interior whitespace run replaced by
/// a single `-`. "  My   Notes " becomes "My-Notes".
pub(crate) fn normalize_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("-")
}

#[instrument(skip(state, payload))]
pub async fn create_gist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<CreateGistRequest>,
) -> Result<(StatusCode, Json<Gist>), ApiError> {
    let title = normalize_title(&payload.title);
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if payload.code.trim().is_empty() {
        return Err(ApiError::Validation("Code is required".into()));
    }

    // Titles are unique across all owners, not per user.
    if Gist::title_taken(&state.db, &title, None).await? {
        warn!(title = %title, "gist title already taken");
        return Err(ApiError::Conflict(
            "A gist with this title already exists".into(),
        ));
    }

    let gist = Gist::create(
        &state.db,
        &user.email,
        &title,
        payload.description.as_deref(),
        &payload.code,
    )
    .await?;

    info!(gist_id = %gist.id, owner = %user.email, "gist created");
    Ok((StatusCode::CREATED, Json(gist)))
}

#[instrument(skip(state))]
pub async fn list_user_gists(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<GistList>, ApiError> {
    let gists = Gist::list_by_owner(&state.db, &user.email).await?;
    Ok(Json(GistList { gists }))
}

#[instrument(skip(state, payload))]
pub async fn update_gist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateGistRequest>,
) -> Result<Json<GistEnvelope>, ApiError> {
    let title = match payload.title.as_deref() {
        Some(raw) => {
            let title = normalize_title(raw);
            if title.is_empty() {
                return Err(ApiError::Validation("Title cannot be empty".into()));
            }
            if Gist::title_taken(&state.db, &title, Some(id)).await? {
                warn!(title = %title, "gist title already taken");
                return Err(ApiError::Conflict(
                    "A gist with this title already exists".into(),
                ));
            }
            Some(title)
        }
        None => None,
    };
    if let Some(code) = payload.code.as_deref() {
        if code.trim().is_empty() {
            return Err(ApiError::Validation("Code cannot be empty".into()));
        }
    }

    let gist = Gist::update_owned(
        &state.db,
        id,
        &user.email,
        title.as_deref(),
        payload.description.as_deref(),
        payload.code.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Gist not found".into()))?;

    info!(gist_id = %gist.id, owner = %user.email, "gist updated");
    Ok(Json(GistEnvelope { gist }))
}

#[instrument(skip(state))]
pub async fn delete_gist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, ApiError> {
    if !Gist::delete_owned(&state.db, id, &user.email).await? {
        return Err(ApiError::NotFound("Gist not found".into()));
    }

    info!(gist_id = %id, owner = %user.email, "gist deleted");
    Ok(Json(Message::new("Gist deleted successfully")))
}
