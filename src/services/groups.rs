// src/services/groups.rs

use sqlx::SqlitePool;

use crate::{
    error::{AppError, is_unique_violation},
    models::group::{CreateGroupRequest, Group},
    utils::html::clean_description,
};

/// All groups, ordered by title.
pub async fn list_groups(pool: &SqlitePool) -> Result<Vec<Group>, AppError> {
    let groups = sqlx::query_as::<_, Group>(
        "SELECT id, title, slug, description FROM post_groups ORDER BY title",
    )
    .fetch_all(pool)
    .await?;

    Ok(groups)
}

pub async fn get_by_slug(pool: &SqlitePool, slug: &str) -> Result<Group, AppError> {
    sqlx::query_as::<_, Group>(
        "SELECT id, title, slug, description FROM post_groups WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Group '{}' not found", slug)))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Group>, AppError> {
    let group = sqlx::query_as::<_, Group>(
        "SELECT id, title, slug, description FROM post_groups WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

/// Creates a group. Title and slug must both be unused.
pub async fn create_group(pool: &SqlitePool, payload: &CreateGroupRequest) -> Result<Group, AppError> {
    sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO post_groups (title, slug, description)
        VALUES (?, ?, ?)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(payload.title.trim())
    .bind(&payload.slug)
    .bind(clean_description(&payload.description))
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "A group with title '{}' or slug '{}' already exists",
                payload.title, payload.slug
            ))
        } else {
            tracing::error!("Failed to create group: {:?}", e);
            AppError::from(e)
        }
    })
}

/// Deletes a group; its posts stay with no group.
pub async fn delete_group(pool: &SqlitePool, slug: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM post_groups WHERE slug = ?")
        .bind(slug)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Group '{}' not found", slug)));
    }

    tracing::info!("Group '{}' deleted", slug);
    Ok(())
}
