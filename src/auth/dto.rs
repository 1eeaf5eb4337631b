use serde::{Deserialize, Serialize};

use super::jwt::SessionUser;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for GitHub login: the authorization code from the
/// OAuth redirect.
#[derive(Debug, Deserialize)]
pub struct GithubLoginRequest {
    pub code: String,
}

/// Request body for profile updates. A missing or empty password keeps
/// the current one.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
    /// Where the client should navigate after storing the token.
    pub redirect_to: String,
}
