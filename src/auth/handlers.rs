use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, GithubLoginRequest, LoginRequest, ProfileUpdateRequest, RegisterRequest,
        },
        extractors::AuthUser,
        jwt::{JwtKeys, SessionUser},
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::{ApiError, Message},
    extract::ApiJson,
    state::AppState,
};

/// Fixed post-login destination handed back to clients.
const DASHBOARD: &str = "/dashboard";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/github", post(github_login))
        .route("/auth/logout", post(logout))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/profile/update", post(update_profile))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    let name = payload.name.trim();

    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }

    // Ensure email is not taken
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, name, &payload.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(Message::new("User created successfully!")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    // Unknown email and wrong password must be indistinguishable to the caller.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let session = SessionUser {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
    };
    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&session)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: session,
        redirect_to: DASHBOARD.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn github_login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GithubLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let code = payload.code.trim();
    if code.is_empty() {
        return Err(ApiError::Validation("Authorization code is required".into()));
    }

    let profile = state.github.authenticate(code).await.map_err(|err| {
        warn!(error = %err, "github authentication failed");
        ApiError::from(err)
    })?;

    let session = SessionUser {
        id: profile.id.to_string(),
        name: profile.name.unwrap_or_else(|| profile.login.clone()),
        email: profile.email.trim().to_lowercase(),
    };
    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&session)?;

    info!(github_id = profile.id, login = %profile.login, "github user logged in");
    Ok(Json(AuthResponse {
        token,
        user: session,
        redirect_to: DASHBOARD.into(),
    }))
}

/// Sessions are stateless, so logout is an acknowledgement; the client
/// discards the token.
#[instrument(skip_all)]
pub async fn logout(AuthUser(user): AuthUser) -> Json<Message> {
    info!(user_id = %user.id, "user logged out");
    Json(Message::new("Logout successful"))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<SessionUser> {
    Json(user)
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(mut payload): ApiJson<ProfileUpdateRequest>,
) -> Result<Json<Message>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    let name = payload.name.trim();

    if name.is_empty() || payload.email.is_empty() {
        return Err(ApiError::Validation("Name and email are required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if payload.email != user.email
        && User::find_by_email(&state.db, &payload.email).await?.is_some()
    {
        warn!(email = %payload.email, "profile email already in use");
        return Err(ApiError::Conflict("Email already in use".into()));
    }

    // An absent or empty password keeps the stored credential.
    let hash = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => Some(hash_password(password)?),
        _ => None,
    };

    let updated = User::update_profile(
        &state.db,
        &user.email,
        name,
        &payload.email,
        hash.as_deref(),
    )
    .await?;

    if updated.is_none() {
        warn!(email = %user.email, "profile update for unknown user");
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(email = %payload.email, "profile updated");
    Ok(Json(Message::new("Profile updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("alice@x"));
        assert!(!is_valid_email("al ice@x.com"));
    }
}
