// src/services/users.rs

use sqlx::SqlitePool;

use crate::{
    error::{AppError, is_unique_violation},
    models::user::{Author, CreateUserRequest, User},
    utils::hash::hash_password,
};

const USER_COLUMNS: &str =
    "id, username, password, first_name, last_name, email, role, created_at";

/// Inserts a user with a freshly hashed password.
/// A taken username is a `Conflict`.
pub async fn create_user(
    pool: &SqlitePool,
    payload: &CreateUserRequest,
    role: &str,
) -> Result<User, AppError> {
    let hashed_password = hash_password(&payload.password)?;

    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, password, first_name, last_name, email, role, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&payload.username)
    .bind(&hashed_password)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(payload.email.as_deref().unwrap_or_default())
    .bind(role)
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::from(e)
        }
    })
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Public profile data of `username`, or `NotFound`.
pub async fn get_author(pool: &SqlitePool, username: &str) -> Result<Author, AppError> {
    sqlx::query_as::<_, Author>(
        "SELECT id, username, first_name, last_name FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
}

pub async fn count_posts(pool: &SqlitePool, author_id: i64) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
