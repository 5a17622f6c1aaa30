use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::statuses::UserStatus;

/// A row of the credential store. The hash is part of the row for
/// verification but is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "userName")]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: String,
    #[serde(rename = "creationDate", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "lastChangedDate", with = "time::serde::rfc3339")]
    pub last_changed_at: OffsetDateTime,
}

impl User {
    pub fn is_locked(&self) -> bool {
        self.status == UserStatus::Locked.as_str()
    }

    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, status, created_at, last_changed_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, status, created_at, last_changed_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn list(db: &SqlitePool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, status, created_at, last_changed_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
        status: UserStatus,
    ) -> sqlx::Result<User> {
        let now = OffsetDateTime::now_utc();
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, status, created_at, last_changed_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, username, password_hash, status, created_at, last_changed_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(status.as_str())
        .bind(now)
        .fetch_one(db)
        .await
    }

    /// Returns the number of rows touched; zero means no such user.
    pub async fn set_status(
        db: &SqlitePool,
        username: &str,
        status: UserStatus,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET status = ?1, last_changed_at = ?2
            WHERE username = ?3
            "#,
        )
        .bind(status.as_str())
        .bind(OffsetDateTime::now_utc())
        .bind(username)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_password_hash(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?1, last_changed_at = ?2
            WHERE username = ?3
            "#,
        )
        .bind(password_hash)
        .bind(OffsetDateTime::now_utc())
        .bind(username)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(db: &SqlitePool, username: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?1")
            .bind(username)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
