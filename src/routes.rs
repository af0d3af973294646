// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    cache::cache_index_page,
    handlers::{self, admin, auth, interaction, posts, profile},
    state::AppState,
    utils::jwt::{admin_required, identify, login_required},
};

/// Assembles the main application router.
///
/// * Public listings (home, group, profile, post detail).
/// * Login-protected mutations and the follow feed.
/// * Admin routes (groups, page cache).
/// * Global middleware: identification, Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    // The home page is the only cached view.
    let index = get(posts::index).layer(middleware::from_fn_with_state(
        state.clone(),
        cache_index_page,
    ));

    let public_routes = Router::new()
        .route("/", index)
        .route("/groups/", get(posts::list_groups))
        .route("/group/{slug}/", get(posts::group_posts))
        .route("/profile/{username}/", get(profile::profile))
        .route("/posts/{post_id}/", get(posts::post_detail));

    let auth_routes = Router::new()
        .route("/auth/signup/", post(auth::signup))
        .route("/auth/login/", get(auth::login_form).post(auth::login))
        .route("/auth/logout/", post(auth::logout));

    let protected_routes = Router::new()
        .route(
            "/create/",
            get(posts::create_post_form).post(posts::create_post),
        )
        .route(
            "/posts/{post_id}/edit/",
            get(posts::edit_post_form).post(posts::edit_post),
        )
        .route(
            "/posts/{post_id}/comment/",
            get(interaction::comment_redirect).post(interaction::add_comment),
        )
        .route("/follow/", get(interaction::follow_index))
        .route(
            "/profile/{username}/follow/",
            get(interaction::profile_follow).post(interaction::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            get(interaction::profile_unfollow).post(interaction::profile_unfollow),
        )
        .route_layer(middleware::from_fn(login_required));

    let admin_routes = Router::new()
        .route("/admin/groups/", post(admin::create_group))
        .route("/admin/groups/{slug}/", delete(admin::delete_group))
        .route("/admin/cache/clear/", post(admin::clear_cache))
        // Double middleware protection: Login first, then Admin check
        .route_layer(middleware::from_fn(admin_required))
        .route_layer(middleware::from_fn(login_required));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .nest_service("/media", ServeDir::new(&state.config.media_root))
        .fallback(handlers::not_found)
        // Global Middleware (applied from outside in)
        .layer(middleware::from_fn_with_state(state.clone(), identify))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
