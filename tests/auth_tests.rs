// tests/auth_tests.rs

mod common;

use common::{location, spawn_app};
use reqwest::multipart::Form;
use serde_json::{Value, json};

#[tokio::test]
async fn signup_then_login_returns_working_token() {
    let app = spawn_app().await;
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = app
        .post_json(
            "/auth/signup/",
            json!({
                "username": username,
                "password": "password123",
                "first_name": "Albert",
                "last_name": "Einstein",
            }),
            None,
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["username"], username.as_str());
    assert!(user.get("password").is_none());

    let login = app
        .post_json(
            "/auth/login/",
            json!({ "username": username, "password": "password123" }),
            None,
        )
        .await;
    assert_eq!(login.status().as_u16(), 200);
    assert!(
        login
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("token=")
    );
    let body: Value = login.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    let create = app.get("/create/", Some(token)).await;
    assert_eq!(create.status().as_u16(), 200);

    let profile: Value = app
        .get(&format!("/profile/{}/", username), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(profile["author"]["first_name"], "Albert");
    assert_eq!(profile["posts_count"], 0);
    assert_eq!(profile["following"], false);
}

#[tokio::test]
async fn signup_rejects_short_username_and_duplicates() {
    let app = spawn_app().await;

    let short = app
        .post_json("/auth/signup/", json!({ "username": "yo", "password": "password123" }), None)
        .await;
    assert_eq!(short.status().as_u16(), 400);

    let first = app
        .post_json("/auth/signup/", json!({ "username": "taken", "password": "password123" }), None)
        .await;
    assert_eq!(first.status().as_u16(), 201);

    let second = app
        .post_json("/auth/signup/", json!({ "username": "taken", "password": "password123" }), None)
        .await;
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn signup_rejects_usernames_unfit_for_profile_urls() {
    let app = spawn_app().await;

    for username in ["ann/bob", "ann\nbob", "ann bob", "ann?bob"] {
        let response = app
            .post_json(
                "/auth/signup/",
                json!({ "username": username, "password": "password123" }),
                None,
            )
            .await;
        assert_eq!(response.status().as_u16(), 400, "{:?}", username);
        let body: Value = response.json().await.unwrap();
        assert!(
            body["errors"]["username"][0]
                .as_str()
                .unwrap()
                .starts_with("Enter a valid username")
        );
    }
    assert_eq!(app.count("SELECT COUNT(*) FROM users").await, 0);

    let ok = app
        .post_json(
            "/auth/signup/",
            json!({ "username": "ann.bob@home", "password": "password123" }),
            None,
        )
        .await;
    assert_eq!(ok.status().as_u16(), 201);
    let profile = app.get("/profile/ann.bob@home/", None).await;
    assert_eq!(profile.status().as_u16(), 200);
}

#[tokio::test]
async fn login_with_next_redirects_back_and_cookie_authenticates() {
    let app = spawn_app().await;
    app.post_json("/auth/signup/", json!({ "username": "writer", "password": "password123" }), None)
        .await;

    let guest = app.get("/create/", None).await;
    let login_url = location(&guest);
    assert_eq!(login_url, "/auth/login/?next=/create/");

    let form_page: Value = app.get(&login_url, None).await.json().await.unwrap();
    assert_eq!(form_page["next"], "/create/");

    let login = app
        .post_json(
            &login_url,
            json!({ "username": "writer", "password": "password123" }),
            None,
        )
        .await;
    assert_eq!(login.status().as_u16(), 302);
    assert_eq!(location(&login), "/create/");

    let cookie = login
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .client
        .post(app.url("/create/"))
        .header(reqwest::header::COOKIE, cookie)
        .multipart(Form::new().text("text", "Posted with a cookie"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/profile/writer/");
}

#[tokio::test]
async fn login_ignores_foreign_next() {
    let app = spawn_app().await;
    app.post_json("/auth/signup/", json!({ "username": "writer", "password": "password123" }), None)
        .await;

    let login = app
        .post_json(
            "/auth/login/?next=https://evil.example/",
            json!({ "username": "writer", "password": "password123" }),
            None,
        )
        .await;
    assert_eq!(login.status().as_u16(), 200);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.post_json("/auth/signup/", json!({ "username": "writer", "password": "password123" }), None)
        .await;

    let login = app
        .post_json("/auth/login/", json!({ "username": "writer", "password": "nope1234" }), None)
        .await;
    assert_eq!(login.status().as_u16(), 401);

    let unknown = app
        .post_json("/auth/login/", json!({ "username": "ghost", "password": "nope1234" }), None)
        .await;
    assert_eq!(unknown.status().as_u16(), 401);
}

#[tokio::test]
async fn invalid_token_is_treated_as_anonymous() {
    let app = spawn_app().await;

    let response = app.get("/follow/", Some("not.a.token")).await;
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/auth/login/?next=/follow/");
}

#[tokio::test]
async fn admin_manages_groups() {
    let app = spawn_app().await;
    let admin = app.create_user_with_role("root", "admin").await;
    let user = app.create_user("TestUser").await;

    let payload = json!({
        "title": "Test",
        "slug": "test-slug",
        "description": "<p>About</p><script>alert(1)</script>",
    });

    let denied = app.post_json("/admin/groups/", payload.clone(), Some(&user.token)).await;
    assert_eq!(denied.status().as_u16(), 403);

    let guest = app.post_json("/admin/groups/", payload.clone(), None).await;
    assert_eq!(guest.status().as_u16(), 302);

    let created = app.post_json("/admin/groups/", payload.clone(), Some(&admin.token)).await;
    assert_eq!(created.status().as_u16(), 201);
    let group: Value = created.json().await.unwrap();
    assert_eq!(group["description"], "<p>About</p>");

    let duplicate = app.post_json("/admin/groups/", payload, Some(&admin.token)).await;
    assert_eq!(duplicate.status().as_u16(), 409);

    let bad_slug = app
        .post_json(
            "/admin/groups/",
            json!({ "title": "Other", "slug": "bad slug!" }),
            Some(&admin.token),
        )
        .await;
    assert_eq!(bad_slug.status().as_u16(), 400);

    let too_long = app
        .post_json(
            "/admin/groups/",
            json!({ "title": "x".repeat(201), "slug": "long" }),
            Some(&admin.token),
        )
        .await;
    assert_eq!(too_long.status().as_u16(), 400);

    let listed: Value = app.get("/groups/", None).await.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_group_keeps_its_posts() {
    let app = spawn_app().await;
    let admin = app.create_user_with_role("root", "admin").await;
    let author = app.create_user("TestUser").await;
    let group = app.create_group("Test", "test-slug").await;
    let post = app.create_post(author.id, "Hello", Some(group.id)).await;

    let response = app
        .client
        .delete(app.url("/admin/groups/test-slug/"))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let kept = yatube::services::posts::get_post(&app.pool, post.id).await.unwrap();
    assert_eq!(kept.group_id, None);
    assert_eq!(app.get("/group/test-slug/", None).await.status().as_u16(), 404);

    let again = app
        .client
        .delete(app.url("/admin/groups/test-slug/"))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 404);
}
