// src/main.rs

use std::time::Duration;

use dotenvy::dotenv;
use sqlx::SqlitePool;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use yatube::config::Config;
use yatube::models::user::CreateUserRequest;
use yatube::routes;
use yatube::services::users;
use yatube::state::AppState;
use yatube::db;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match db::connect(&config.database_url, 5).await {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to open database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    db::migrate(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Seed Admin User
    if let Err(e) = seed_admin_user(&pool, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.media_root).await {
        tracing::warn!("Could not create media root {:?}: {}", config.media_root, e);
    }

    let addr = config.bind_addr.clone();
    let state = AppState::new(pool, config);

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listening address");
    tracing::info!("Yatube listening on {}", addr);

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

async fn seed_admin_user(pool: &SqlitePool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        if users::find_by_username(pool, username).await?.is_none() {
            tracing::info!("Seeding admin user: {}", username);
            let request = CreateUserRequest {
                username: username.clone(),
                password: password.clone(),
                first_name: String::new(),
                last_name: String::new(),
                email: None,
            };
            users::create_user(pool, &request, "admin").await?;
            tracing::info!("Admin user created successfully.");
        }
    }
    Ok(())
}
