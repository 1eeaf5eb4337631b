use crate::auth::repo_types::User;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &SqlitePool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Update the profile of the user currently stored under `current_email`.
    /// A `None` password hash leaves the stored credential untouched.
    /// Returns `None` when no such user exists.
    pub async fn update_profile(
        db: &SqlitePool,
        current_email: &str,
        name: &str,
        new_email: &str,
        password_hash: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = ?, email = ?, password_hash = COALESCE(?, password_hash)
            WHERE email = ?
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(new_email)
        .bind(password_hash)
        .bind(current_email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
