// tests/common/mod.rs
#![allow(dead_code)]

use std::path::PathBuf;

use reqwest::{Response, multipart::Form};
use sqlx::SqlitePool;
use yatube::{
    cache::PageCache,
    config::Config,
    db,
    models::{group::Group, post::Post},
    routes,
    state::AppState,
    utils::jwt::sign_jwt,
};

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

pub struct TestApp {
    pub address: String,
    /// Scratch directory holding the database and media; removed on drop.
    pub dir: PathBuf,
    pub pool: SqlitePool,
    pub cache: PageCache,
    pub media_root: PathBuf,
    pub client: reqwest::Client,
}

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// Spawns the app on a random port against a fresh SQLite file.
pub async fn spawn_app() -> TestApp {
    let dir = std::env::temp_dir().join(format!("yatube-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("Failed to create test directory");

    let database_url = format!("sqlite://{}", dir.join("db.sqlite3").display());
    let pool = db::connect(&database_url, 4)
        .await
        .expect("Failed to open test database");
    db::migrate(&pool).await.expect("Failed to migrate database");

    let media_root = dir.join("media");
    let config = Config {
        database_url,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_username: None,
        admin_password: None,
        media_root: media_root.clone(),
        index_cache_ttl: 300,
        bind_addr: "127.0.0.1:0".to_string(),
    };

    let state = AppState::new(pool.clone(), config);
    let cache = state.page_cache.clone();
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        dir,
        pool,
        cache,
        media_root,
        client,
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Inserts a user directly (no password hashing) and signs a token.
    pub async fn create_user_with_role(&self, username: &str, role: &str) -> TestUser {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, first_name, last_name, email, role, created_at) \
             VALUES (?, '!', '', '', '', ?, ?) RETURNING id",
        )
        .bind(username)
        .bind(role)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await
        .unwrap();

        let token = sign_jwt(id, username, role, JWT_SECRET, 600).unwrap();
        TestUser {
            id,
            username: username.to_string(),
            token,
        }
    }

    pub async fn create_user(&self, username: &str) -> TestUser {
        self.create_user_with_role(username, "user").await
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> Group {
        sqlx::query_as::<_, Group>(
            "INSERT INTO post_groups (title, slug, description) VALUES (?, ?, ?) \
             RETURNING id, title, slug, description",
        )
        .bind(title)
        .bind(slug)
        .bind("Test description")
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    pub async fn create_post(&self, author_id: i64, text: &str, group_id: Option<i64>) -> Post {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (text, pub_date, author_id, group_id, image) \
             VALUES (?, ?, ?, ?, NULL) \
             RETURNING id, text, pub_date, author_id, group_id, image",
        )
        .bind(text)
        .bind(chrono::Utc::now())
        .bind(author_id)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_form(&self, path: &str, form: Form, token: Option<&str>) -> Response {
        let mut request = self.client.post(self.url(path)).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> Response {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(&self.pool).await.unwrap()
    }
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn gif_part(name: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(SMALL_GIF.to_vec())
        .file_name(name.to_string())
        .mime_str("image/gif")
        .unwrap()
}
