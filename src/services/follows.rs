// src/services/follows.rs

use sqlx::SqlitePool;

use crate::error::AppError;

/// Makes `user_id` follow `author_id`.
///
/// Idempotent: an existing edge is absorbed by the unique constraint and
/// reported as `false`. Following oneself is allowed.
pub async fn follow(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query(
        "INSERT INTO follows (user_id, author_id) VALUES (?, ?) \
         ON CONFLICT (user_id, author_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(author_id)
    .execute(pool)
    .await?;

    let created = result.rows_affected() > 0;
    if created {
        tracing::info!("User {} now follows user {}", user_id, author_id);
    }
    Ok(created)
}

/// Removes the edge if present. Returns whether anything was deleted.
pub async fn unfollow(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_following(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = ? AND author_id = ?)",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Number of follow edges between the two users (0 or 1).
pub async fn edge_count(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<i64, AppError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}
