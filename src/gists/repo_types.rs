use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Gist record in the database. Serialized as-is in API responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gist {
    pub id: Uuid,
    /// Normalized form: trimmed, inner whitespace runs collapsed to `-`.
    /// Unique across the whole store, not per owner.
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    /// Email of the owning user at creation time.
    pub owner_email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
