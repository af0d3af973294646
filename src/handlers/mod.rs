// src/handlers/mod.rs

use axum::{http::Uri, response::IntoResponse};

use crate::error::AppError;

pub mod admin;
pub mod auth;
pub mod interaction;
pub mod posts;
pub mod profile;

/// Fallback for every unknown path.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    AppError::NotFound(format!("Page '{}' not found", uri.path()))
}
