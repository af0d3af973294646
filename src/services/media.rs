// src/services/media.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{error::AppError, models::post::UploadedImage};

/// Upload directory for post images, relative to the media root.
pub const POST_IMAGE_DIR: &str = "posts";

/// True when the bytes start like a known image format.
pub fn is_image(data: &[u8]) -> bool {
    image::guess_format(data).is_ok()
}

/// Reduces a client file name to `[A-Za-z0-9._-]`, never empty.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

/// Appends a short random suffix before the extension.
fn with_suffix(name: &str) -> String {
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..7];
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", name, suffix),
    }
}

/// Writes the image under `<media_root>/posts/` and returns its relative path
/// (`posts/<name>`). A name already in use gets a random suffix.
pub async fn store_post_image(media_root: &Path, image: &UploadedImage) -> Result<String, AppError> {
    let dir: PathBuf = media_root.join(POST_IMAGE_DIR);
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        AppError::InternalServerError(format!("Failed to create media directory: {}", e))
    })?;

    let base = sanitize_file_name(&image.file_name);
    let mut name = base.clone();
    // `create_new` makes the name claim atomic, so concurrent uploads of the
    // same file name never overwrite each other.
    let mut file = loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&name))
            .await
        {
            Ok(file) => break file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => name = with_suffix(&base),
            Err(e) => {
                return Err(AppError::InternalServerError(format!(
                    "Failed to store image: {}",
                    e
                )));
            }
        }
    };

    file.write_all(&image.data)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Failed to store image: {}", e)))?;
    file.flush()
        .await
        .map_err(|e| AppError::InternalServerError(format!("Failed to store image: {}", e)))?;

    tracing::debug!("Stored post image {}/{}", POST_IMAGE_DIR, name);
    Ok(format!("{}/{}", POST_IMAGE_DIR, name))
}
