// src/services/posts.rs

use std::borrow::Cow;
use std::path::Path;

use sqlx::SqlitePool;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::AppError,
    models::{
        comment::{Comment, CommentForm, CommentView},
        post::{Post, PostForm, PostView, UploadedImage},
    },
    services::{groups, media},
};

pub const INVALID_GROUP: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Columns of `PostView`, for queries over `posts p`.
pub const POST_VIEW_SELECT: &str = r#"
    SELECT
        p.id, p.text, p.pub_date, p.image,
        p.author_id, u.username AS author_username,
        p.group_id, g.title AS group_title, g.slug AS group_slug
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_groups g ON g.id = p.group_id
"#;

/// A post form that passed validation.
#[derive(Debug)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<UploadedImage>,
}

/// Runs the field validators plus the checks that need the store:
/// the group must exist and the image must be a real image.
/// All failures are reported together.
pub async fn clean_post_form(pool: &SqlitePool, form: PostForm) -> Result<CleanPost, AppError> {
    let mut errors = form.validate().err().unwrap_or_else(ValidationErrors::new);

    let mut group_id = None;
    if let Some(raw) = form.group.as_deref() {
        let found = match raw.parse::<i64>() {
            Ok(id) => groups::find_by_id(pool, id).await?.map(|g| g.id),
            Err(_) => None,
        };
        match found {
            Some(id) => group_id = Some(id),
            None => errors.add(
                "group",
                ValidationError::new("invalid_choice").with_message(Cow::Borrowed(INVALID_GROUP)),
            ),
        }
    }

    if let Some(image) = &form.image {
        if !media::is_image(&image.data) {
            errors.add(
                "image",
                ValidationError::new("invalid_image").with_message(Cow::Borrowed(INVALID_IMAGE)),
            );
        }
    }

    if !errors.is_empty() {
        return Err(AppError::invalid_form(&errors, &form));
    }

    Ok(CleanPost {
        text: form.text,
        group_id,
        image: form.image,
    })
}

pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Post, AppError> {
    sqlx::query_as::<_, Post>(
        "SELECT id, text, pub_date, author_id, group_id, image FROM posts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

pub async fn get_post_view(pool: &SqlitePool, id: i64) -> Result<PostView, AppError> {
    sqlx::query_as::<_, PostView>(&format!("{} WHERE p.id = ?", POST_VIEW_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

/// Publishes a new post by `author_id`. The publication date is set here
/// and never changes afterwards.
pub async fn create_post(
    pool: &SqlitePool,
    media_root: &Path,
    author_id: i64,
    form: PostForm,
) -> Result<Post, AppError> {
    let clean = clean_post_form(pool, form).await?;

    let image = match &clean.image {
        Some(upload) => Some(media::store_post_image(media_root, upload).await?),
        None => None,
    };

    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (text, pub_date, author_id, group_id, image)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, text, pub_date, author_id, group_id, image
        "#,
    )
    .bind(&clean.text)
    .bind(chrono::Utc::now())
    .bind(author_id)
    .bind(clean.group_id)
    .bind(&image)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Post {} created by user {}", post.id, author_id);
    Ok(post)
}

/// Only the author may edit; anyone else gets `Forbidden` and the post is
/// left untouched. A missing group clears it, a missing image keeps the
/// current one.
pub async fn edit_post(
    pool: &SqlitePool,
    media_root: &Path,
    post_id: i64,
    actor_id: i64,
    form: PostForm,
) -> Result<Post, AppError> {
    let post = get_post(pool, post_id).await?;
    ensure_author(&post, actor_id)?;

    let clean = clean_post_form(pool, form).await?;

    let image = match &clean.image {
        Some(upload) => Some(media::store_post_image(media_root, upload).await?),
        None => post.image,
    };

    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET text = ?, group_id = ?, image = ?
        WHERE id = ?
        RETURNING id, text, pub_date, author_id, group_id, image
        "#,
    )
    .bind(&clean.text)
    .bind(clean.group_id)
    .bind(&image)
    .bind(post_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to edit post {}: {:?}", post_id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Post {} edited by its author", post.id);
    Ok(post)
}

pub fn ensure_author(post: &Post, actor_id: i64) -> Result<(), AppError> {
    if post.author_id != actor_id {
        return Err(AppError::Forbidden(
            "Only the author can edit this post".to_string(),
        ));
    }
    Ok(())
}

/// Comments on an existing post.
pub async fn add_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    form: CommentForm,
) -> Result<Comment, AppError> {
    let post = get_post(pool, post_id).await?;

    if let Err(errors) = form.validate() {
        return Err(AppError::invalid_form(&errors, &form));
    }

    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, author_id, text, created)
        VALUES (?, ?, ?, ?)
        RETURNING id, post_id, author_id, text, created
        "#,
    )
    .bind(post.id)
    .bind(author_id)
    .bind(&form.text)
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Comments of a post, newest first.
pub async fn list_comments(pool: &SqlitePool, post_id: i64) -> Result<Vec<CommentView>, AppError> {
    let comments = sqlx::query_as::<_, CommentView>(
        r#"
        SELECT
            c.id, c.post_id, c.author_id, u.username AS author_username,
            c.text, c.created
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.created DESC, c.id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
