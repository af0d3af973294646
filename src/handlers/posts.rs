use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::post::{PostForm, PostFormPage},
    pagination::PageParams,
    services::{
        feed::{self, FeedScope},
        groups, posts, users,
    },
    utils::{jwt::Claims, redirect},
};

const FORM_FIELDS: [&str; 3] = ["text", "group", "image"];

/// Home page: every post, newest first.
/// Served through the page cache (see `cache::cache_index_page`).
pub async fn index(
    State(pool): State<SqlitePool>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = feed::list_posts(&pool, FeedScope::All, params.page.as_deref()).await?;

    Ok(Json(json!({ "page": page })))
}

/// Posts of one group.
pub async fn group_posts(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let group = groups::get_by_slug(&pool, &slug).await?;
    let page = feed::list_posts(&pool, FeedScope::Group(group.id), params.page.as_deref()).await?;

    Ok(Json(json!({ "group": group, "page": page })))
}

/// All groups, by title.
pub async fn list_groups(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let groups = groups::list_groups(&pool).await?;
    Ok(Json(groups))
}

/// A single post with its comments.
pub async fn post_detail(
    State(pool): State<SqlitePool>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = posts::get_post_view(&pool, post_id).await?;
    let author_posts_count = users::count_posts(&pool, post.author_id).await?;
    let comments = posts::list_comments(&pool, post_id).await?;

    Ok(Json(json!({
        "post": post,
        "author_posts_count": author_posts_count,
        "comments": comments,
    })))
}

/// Empty post form with the groups to choose from.
pub async fn create_post_form(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let groups = groups::list_groups(&pool).await?;

    Ok(Json(PostFormPage {
        is_edit: false,
        fields: FORM_FIELDS,
        groups,
        post: None,
    }))
}

/// Publishes a post and sends the author to their profile.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let author_id = claims.user_id()?;
    let form = PostForm::from_multipart(multipart).await?;

    posts::create_post(&pool, &config.media_root, author_id, form).await?;

    Ok(redirect::found(&redirect::profile_url(&claims.username)))
}

/// Edit form filled with the post. Non-authors go back to the post.
pub async fn edit_post_form(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
) -> Result<Response, AppError> {
    let post = posts::get_post(&pool, post_id).await?;
    if posts::ensure_author(&post, claims.user_id()?).is_err() {
        return Ok(redirect::found(&redirect::post_detail_url(post_id)));
    }

    let groups = groups::list_groups(&pool).await?;

    Ok(Json(PostFormPage {
        is_edit: true,
        fields: FORM_FIELDS,
        groups,
        post: Some(post),
    })
    .into_response())
}

/// Saves an edit and sends the author back to the post.
/// A non-author is redirected to the post, which stays unchanged.
pub async fn edit_post(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let actor_id = claims.user_id()?;

    // Decide on authorship before reading the body.
    let post = posts::get_post(&pool, post_id).await?;
    if posts::ensure_author(&post, actor_id).is_err() {
        tracing::warn!("User {} tried to edit post {}", actor_id, post_id);
        return Ok(redirect::found(&redirect::post_detail_url(post_id)));
    }

    let form = PostForm::from_multipart(multipart).await?;

    match posts::edit_post(&pool, &config.media_root, post_id, actor_id, form).await {
        Ok(_) => Ok(redirect::found(&redirect::post_detail_url(post_id))),
        Err(AppError::Forbidden(reason)) => {
            tracing::warn!("User {} tried to edit post {}: {}", actor_id, post_id, reason);
            Ok(redirect::found(&redirect::post_detail_url(post_id)))
        }
        Err(e) => Err(e),
    }
}
