use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// A todo with its status name joined in; the wire never sees raw status
/// ids.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Todo {
    #[serde(rename = "Id")]
    pub id: i64,
    pub description: String,
    pub status: String,
    #[serde(rename = "creationDate", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn list(db: &SqlitePool) -> sqlx::Result<Vec<Todo>> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT t.id, t.description, s.name AS status, t.created_at
        FROM todos t
        JOIN statuses s ON s.id = t.status_id
        ORDER BY t.id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Todo>> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT t.id, t.description, s.name AS status, t.created_at
        FROM todos t
        JOIN statuses s ON s.id = t.status_id
        WHERE t.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create(db: &SqlitePool, description: &str, status_id: i64) -> sqlx::Result<Todo> {
    let now = OffsetDateTime::now_utc();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO todos (description, status_id, created_at)
        VALUES (?1, ?2, ?3)
        RETURNING id
        "#,
    )
    .bind(description)
    .bind(status_id)
    .bind(now)
    .fetch_one(db)
    .await?;
    find_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Persist a new status for a todo inside its own transaction. Returns the
/// number of rows touched; zero means no such todo.
pub async fn update_status(db: &SqlitePool, id: i64, status_id: i64) -> sqlx::Result<u64> {
    let mut tx = db.begin().await?;
    let result = sqlx::query("UPDATE todos SET status_id = ?1 WHERE id = ?2")
        .bind(status_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
