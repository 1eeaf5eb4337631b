use sqlx::SqlitePool;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::gists::repo_types::Gist;

/// The owner listing orders by `created_at` as text, so timestamps are stored
/// in a fixed-width UTC form. Letting sqlx render them via Rfc3339 would trim
/// trailing subsecond zeros, and ".5Z" sorts after ".56Z" as text.
fn timestamp_text(ts: OffsetDateTime) -> String {
    let ts = ts.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}Z",
        ts.year(),
        u8::from(ts.month()),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second(),
        ts.microsecond(),
    )
}

impl Gist {
    pub async fn create(
        db: &SqlitePool,
        owner_email: &str,
        title: &str,
        description: Option<&str>,
        code: &str,
    ) -> anyhow::Result<Gist> {
        let now = timestamp_text(OffsetDateTime::now_utc());
        let gist = sqlx::query_as::<_, Gist>(
            r#"
            INSERT INTO gists (id, title, description, code, owner_email, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, title, description, code, owner_email, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(code)
        .bind(owner_email)
        .bind(now.as_str())
        .bind(now.as_str())
        .fetch_one(db)
        .await?;
        Ok(gist)
    }

    /// All gists owned by `owner_email`, newest first.
    pub async fn list_by_owner(db: &SqlitePool, owner_email: &str) -> anyhow::Result<Vec<Gist>> {
        let rows = sqlx::query_as::<_, Gist>(
            r#"
            SELECT id, title, description, code, owner_email, created_at, updated_at
            FROM gists
            WHERE owner_email = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_email)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Whether a normalized title is already in use, optionally ignoring one
    /// gist (the one being updated).
    pub async fn title_taken(
        db: &SqlitePool,
        title: &str,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM gists
            WHERE title = ? AND (? IS NULL OR id != ?)
            "#,
        )
        .bind(title)
        .bind(exclude)
        .bind(exclude)
        .fetch_one(db)
        .await?;
        Ok(count > 0)
    }

    /// Apply the provided fields to a gist the caller owns. `None` fields are
    /// left untouched. Returns `None` when no row matches both the id and the
    /// owner, so a foreign gist is indistinguishable from a missing one.
    pub async fn update_owned(
        db: &SqlitePool,
        id: Uuid,
        owner_email: &str,
        title: Option<&str>,
        description: Option<&str>,
        code: Option<&str>,
    ) -> anyhow::Result<Option<Gist>> {
        let gist = sqlx::query_as::<_, Gist>(
            r#"
            UPDATE gists
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                code = COALESCE(?, code),
                updated_at = ?
            WHERE id = ? AND owner_email = ?
            RETURNING id, title, description, code, owner_email, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(code)
        .bind(timestamp_text(OffsetDateTime::now_utc()))
        .bind(id)
        .bind(owner_email)
        .fetch_optional(db)
        .await?;
        Ok(gist)
    }

    /// Delete a gist the caller owns. Returns `false` when nothing matched.
    pub async fn delete_owned(
        db: &SqlitePool,
        id: Uuid,
        owner_email: &str,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM gists
            WHERE id = ? AND owner_email = ?
            "#,
        )
        .bind(id)
        .bind(owner_email)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
