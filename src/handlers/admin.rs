// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    cache::PageCache,
    error::AppError,
    models::group::CreateGroupRequest,
    services::groups,
};

/// Creates a group.
/// Admin only.
pub async fn create_group(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::invalid_form(&validation_errors, &payload));
    }

    let group = groups::create_group(&pool, &payload).await?;
    tracing::info!("Group '{}' created", group.slug);

    Ok((StatusCode::CREATED, Json(group)))
}

/// Deletes a group; its posts lose their group.
/// Admin only.
pub async fn delete_group(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    groups::delete_group(&pool, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Empties the page cache so the next home page request renders anew.
/// Admin only.
pub async fn clear_cache(State(cache): State<PageCache>) -> impl IntoResponse {
    cache.clear();
    tracing::info!("Page cache cleared");
    StatusCode::NO_CONTENT
}
