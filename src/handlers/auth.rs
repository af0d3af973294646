// src/handlers/auth.rs

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, NextParams},
    services::users,
    utils::{
        hash::verify_password,
        jwt::{expired_session_cookie, session_cookie, sign_jwt},
        redirect,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn signup(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::invalid_form(&validation_errors, &payload));
    }

    let user = users::create_user(&pool, &payload, "user").await?;
    tracing::info!("User '{}' registered", user.username);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Describes the login form and the page the user will return to.
pub async fn login_form(Query(params): Query<NextParams>) -> impl IntoResponse {
    let next = redirect::safe_next(params.next.as_deref());
    Json(json!({
        "fields": ["username", "password"],
        "next": next,
    }))
}

/// Authenticates a user and issues a JWT.
///
/// The token is returned in the body and as the session cookie. With a safe
/// `?next=` the response is a redirect back to the requested page.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Query(params): Query<NextParams>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let user = users::find_by_username(&pool, &payload.username)
        .await?
        .ok_or(AppError::AuthError("Invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid username or password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.username,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;
    let cookie = session_cookie(&token, config.jwt_expiration);

    if let Some(next) = redirect::safe_next(params.next.as_deref()) {
        let mut response = redirect::found(next);
        if let Ok(value) = cookie.parse() {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        return Ok(response);
    }

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "token": token,
            "type": "Bearer",
            "username": user.username,
        })),
    )
        .into_response())
}

/// Drops the session cookie.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(json!({ "logged_out": true })),
    )
}
