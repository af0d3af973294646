use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    pagination::PageParams,
    services::{
        feed::{self, FeedScope},
        follows, users,
    },
    utils::jwt::Viewer,
};

/// An author's page: who they are, how much they wrote, their posts, and
/// whether the viewer follows them.
pub async fn profile(
    State(pool): State<SqlitePool>,
    Viewer(viewer): Viewer,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let author = users::get_author(&pool, &username).await?;
    let posts_count = users::count_posts(&pool, author.id).await?;
    let page = feed::list_posts(&pool, FeedScope::Author(author.id), params.page.as_deref()).await?;

    let following = match viewer {
        Some(claims) => follows::is_following(&pool, claims.user_id()?, author.id).await?,
        None => false,
    };

    Ok(Json(json!({
        "author": author,
        "posts_count": posts_count,
        "following": following,
        "page": page,
    })))
}
