use std::fmt;

use axum::{body::Bytes, extract::Multipart};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{error::AppError, utils::validation::validate_message_text};

/// Characters of text shown when a post is displayed by itself.
pub const SHORT_TEXT_LEN: usize = 15;

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,

    /// Set once at creation.
    pub pub_date: chrono::DateTime<chrono::Utc>,

    pub author_id: i64,
    pub group_id: Option<i64>,

    /// Path relative to the media root, e.g. `posts/cat.gif`.
    pub image: Option<String>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_text(&self.text))
    }
}

/// First characters of a text, the way posts and comments display.
pub fn short_text(text: &str) -> String {
    text.chars().take(SHORT_TEXT_LEN).collect()
}

/// A post joined with its author and group, as listed in feeds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub pub_date: chrono::DateTime<chrono::Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
}

/// An image file received with a post form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Bytes,
}

/// Submitted post form (create and edit share it).
#[derive(Debug, Default, Serialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "validate_message_text"))]
    pub text: String,

    /// Raw group choice (a group id); empty means no group.
    pub group: Option<String>,

    #[serde(skip)]
    pub image: Option<UploadedImage>,
}

impl PostForm {
    /// Reads the `text`, `group` and `image` fields of a multipart body.
    /// Unknown fields are ignored; an empty file input means no image.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = PostForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => {
                    form.text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                }
                "group" => {
                    let raw = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    let raw = raw.trim();
                    form.group = (!raw.is_empty()).then(|| raw.to_string());
                }
                "image" => {
                    let file_name = field.file_name().map(str::to_owned);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                        if !data.is_empty() {
                            form.image = Some(UploadedImage {
                                file_name,
                                data,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Form description returned by `GET /create/` and `GET /posts/{id}/edit/`.
#[derive(Debug, Serialize)]
pub struct PostFormPage {
    pub is_edit: bool,
    pub fields: [&'static str; 3],
    pub groups: Vec<crate::models::group::Group>,
    pub post: Option<Post>,
}
