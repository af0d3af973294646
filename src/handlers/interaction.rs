use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::comment::CommentForm,
    pagination::PageParams,
    services::{
        feed::{self, FeedScope},
        follows, posts, users,
    },
    utils::{jwt::Claims, redirect},
};

/// Adds a comment and sends the user back to the post.
pub async fn add_comment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> Result<Response, AppError> {
    let author_id = claims.user_id()?;
    let comment = posts::add_comment(&pool, post_id, author_id, form).await?;
    tracing::debug!("Comment {} added to post {}", comment.id, post_id);

    Ok(redirect::found(&redirect::post_detail_url(post_id)))
}

/// A plain GET on the comment URL has nothing to save.
pub async fn comment_redirect(
    State(pool): State<SqlitePool>,
    Path(post_id): Path<i64>,
) -> Result<Response, AppError> {
    let post = posts::get_post(&pool, post_id).await?;
    Ok(redirect::found(&redirect::post_detail_url(post.id)))
}

/// Posts of every author the current user follows.
pub async fn follow_index(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let page = feed::list_posts(&pool, FeedScope::FollowedBy(user_id), params.page.as_deref()).await?;

    Ok(Json(json!({ "page": page })))
}

pub async fn profile_follow(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let author = users::get_author(&pool, &username).await?;
    follows::follow(&pool, claims.user_id()?, author.id).await?;

    Ok(redirect::found(&redirect::profile_url(&author.username)))
}

pub async fn profile_unfollow(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let author = users::get_author(&pool, &username).await?;
    follows::unfollow(&pool, claims.user_id()?, author.id).await?;

    Ok(redirect::found(&redirect::profile_url(&author.username)))
}
