// src/utils/redirect.rs

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Where anonymous users are sent for protected actions.
pub const LOGIN_URL: &str = "/auth/login/";

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `/auth/login/?next=<encoded target>`, keeping `/` readable.
pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{}?next={}", LOGIN_URL, encoded.replace("%2F", "/"))
}

pub fn to_login(next: &str) -> Response {
    found(&login_url(next))
}

/// Accepts only local absolute paths as a post-login target.
/// Anything carrying a scheme or host (`//evil`, `https://..`) is refused.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        Some(next)
    } else {
        None
    }
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}

pub fn post_detail_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}
