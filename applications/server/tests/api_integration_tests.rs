/// API integration tests
/// Tests complete HTTP request/response cycles with a real database
mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{TestApp, TEST_PASSWORD};
use newcomer_core::UserStore;
use serde_json::json;

// ============================================================================
// Public routes
// ============================================================================

#[tokio::test]
async fn test_welcome_and_health() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Welcome to Newcomer API");

    let response = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert!(response.body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_404_envelope() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert!(response.body["error"].is_string());
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_register_sets_cookie_and_returns_token() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "fullName": "Ada Lovelace",
                "username": "ada",
                "email": "Ada@Example.com",
                "password": "secret1",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    let token = response.body["token"].as_str().unwrap();

    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with(&format!("token={token};")));
    assert!(cookie.contains("HttpOnly"));

    let me = app.get("/api/auth/me", token).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "ada");
    assert_eq!(me.body["data"]["email"], "ada@example.com");
    assert_eq!(me.body["data"]["role"], "user");
    assert_eq!(me.body["data"]["followerCount"], 0);
    assert!(me.body["data"].get("password").is_none());
    assert!(me.body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "fullName": "",
                "username": "bob",
                "email": "not-an-email",
                "password": "123",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);

    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"fullName"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_register_cannot_claim_admin() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "fullName": "Mallory",
                "username": "mallory",
                "email": "mallory@example.com",
                "password": "secret1",
                "role": "admin",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "role");
}

#[tokio::test]
async fn test_register_duplicate_user() {
    let app = TestApp::new().await;
    app.register("dup").await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "fullName": "Other",
                "username": "someone-else",
                "email": "DUP@example.com",
                "password": "secret1",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "User already exists");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_login_flow() {
    let app = TestApp::new().await;
    let user = app.register("grace").await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "grace@example.com", "password": TEST_PASSWORD })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let token = response.body["token"].as_str().unwrap();
    assert!(response.headers.contains_key(header::SET_COOKIE));

    let me = app.get("/api/auth/me", token).await;
    assert_eq!(me.body["data"]["id"], user.id.as_str());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = TestApp::new().await;
    app.register("linus").await;

    for (email, password) in [
        ("linus@example.com", "wrong-password"),
        ("nobody@example.com", TEST_PASSWORD),
    ] {
        let response = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);

    let response = app.get("/api/auth/me", "garbage").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_authentication() {
    let app = TestApp::new().await;
    let user = app.register("cookie").await;

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("token={}", user.token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "cookie");
}

#[tokio::test]
async fn test_cookie_among_others_and_quoted() {
    let app = TestApp::new().await;
    let user = app.register("quoted").await;

    for cookie in [
        format!("theme=dark; token={}; lang=en", user.token),
        format!("token=\"{}\"", user.token),
    ] {
        let request = Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, cookie.clone())
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;

        assert_eq!(response.status, StatusCode::OK, "cookie header: {cookie}");
        assert_eq!(response.body["data"]["username"], "quoted");
    }
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = TestApp::new().await;
    let user = app.register("lowercase").await;

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("bearer {}", user.token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "lowercase");
}

#[tokio::test]
async fn test_logout_with_cookie_only() {
    let app = TestApp::new().await;
    let user = app.register("browser").await;

    let request = Request::builder()
        .uri("/api/auth/logout")
        .header(header::COOKIE, format!("token={}", user.token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    let cleared = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("token=;"));
    assert!(cleared.contains("Max-Age=0"));

    let response = app.get("/api/auth/me", &user.token).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let user = app.register("leaving").await;

    let response = app.get("/api/auth/logout", &user.token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"], json!({}));

    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));

    let response = app.get("/api/auth/me", &user.token).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_list_users_requires_admin() {
    let app = TestApp::new().await;
    let user = app.register("regular").await;
    let admin = app.create_admin("root").await;

    let response = app.get("/api/users", &user.token).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["success"], false);

    let response = app.get("/api/users", &admin.token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 2);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let response = app
        .get(&format!("/api/users/{}", bob.id), &alice.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "bob");

    let response = app.get("/api/users/does-not-exist", &alice.token).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "User not found");
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = TestApp::new().await;
    let user = app.register("editor").await;

    let response = app
        .put(
            &format!("/api/users/{}", user.id),
            &user.token,
            Some(json!({
                "bio": "Rustacean",
                "skills": ["rust", "sql", "rust"],
                "fullName": null,
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["bio"], "Rustacean");
    assert_eq!(data["skills"], json!(["rust", "sql"]));
    assert_eq!(data["fullName"], "editor Example");
}

#[tokio::test]
async fn test_update_validation() {
    let app = TestApp::new().await;
    let user = app.register("longname").await;
    let uri = format!("/api/users/{}", user.id);

    let response = app
        .put(&uri, &user.token, Some(json!({ "fullName": "x".repeat(51) })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "fullName");

    let response = app
        .put(&uri, &user.token, Some(json!({ "skills": "rust" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "skills");
}

#[tokio::test]
async fn test_update_other_user_is_forbidden() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let response = app
        .put(
            &format!("/api/users/{}", bob.id),
            &alice.token,
            Some(json!({ "bio": "hijacked" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "Not authorized to update this user");

    let bob_now = app.store.get_user(&bob.id).await.unwrap().unwrap();
    assert_eq!(bob_now.bio, None);
}

// ============================================================================
// Follows
// ============================================================================

#[tokio::test]
async fn test_follow_and_unfollow_scenario() {
    let app = TestApp::new().await;
    let u1 = app.register("u1").await;
    let u2 = app.register("u2").await;
    let follow_uri = format!("/api/users/{}/follow", u2.id);
    let unfollow_uri = format!("/api/users/{}/unfollow", u2.id);

    let response = app.put(&follow_uri, &u1.token, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "User followed successfully");

    let target = app.store.get_user(&u2.id).await.unwrap().unwrap();
    assert_eq!(target.followers, vec![u1.id.clone()]);
    assert_eq!(target.follower_count, 1);
    let caller = app.store.get_user(&u1.id).await.unwrap().unwrap();
    assert_eq!(caller.following, vec![u2.id.clone()]);

    // Second follow is rejected and changes nothing
    let response = app.put(&follow_uri, &u1.token, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "You are already following this user");
    let target = app.store.get_user(&u2.id).await.unwrap().unwrap();
    assert_eq!(target.follower_count, 1);

    let response = app.put(&unfollow_uri, &u1.token, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "User unfollowed successfully");

    let target = app.store.get_user(&u2.id).await.unwrap().unwrap();
    assert!(target.followers.is_empty());
    assert_eq!(target.follower_count, 0);
    let caller = app.store.get_user(&u1.id).await.unwrap().unwrap();
    assert!(caller.following.is_empty());

    let response = app.put(&unfollow_uri, &u1.token, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "You are not following this user");
}

#[tokio::test]
async fn test_follow_self_is_rejected() {
    let app = TestApp::new().await;
    let user = app.register("narcissus").await;

    let response = app
        .put(&format!("/api/users/{}/follow", user.id), &user.token, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "You cannot follow yourself");

    let response = app
        .put(&format!("/api/users/{}/unfollow", user.id), &user.token, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "You cannot unfollow yourself");
}

#[tokio::test]
async fn test_follow_missing_target() {
    let app = TestApp::new().await;
    let user = app.register("lonely").await;

    let response = app.put("/api/users/ghost/follow", &user.token, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "User to follow not found");

    let response = app.put("/api/users/ghost/unfollow", &user.token, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "User to unfollow not found");
}

#[tokio::test]
async fn test_register_login_follow_unfollow_scenario() {
    let app = TestApp::new().await;

    let u1 = app.register("u1").await;
    let login = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "u1@example.com", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let u1_token = login.body["token"].as_str().unwrap().to_string();

    let u2 = app.register("u2").await;

    let response = app
        .put(&format!("/api/users/{}/follow", u2.id), &u1_token, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.get(&format!("/api/users/{}", u2.id), &u1_token).await;
    assert_eq!(response.body["data"]["followerCount"], 1);
    assert_eq!(response.body["data"]["followers"], json!([u1.id.as_str()]));

    let response = app.get("/api/auth/me", &u1_token).await;
    assert_eq!(response.body["data"]["following"], json!([u2.id.as_str()]));

    let response = app
        .put(&format!("/api/users/{}/unfollow", u2.id), &u1_token, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.get(&format!("/api/users/{}", u2.id), &u1_token).await;
    assert_eq!(response.body["data"]["followerCount"], 0);
    assert_eq!(response.body["data"]["followers"], json!([]));
}
