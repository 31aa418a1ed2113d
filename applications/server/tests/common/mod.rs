//! Common test utilities and fixtures
//!
//! Every test app gets its own SQLite file in a temp dir, so migrations and
//! constraints behave exactly as in production.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use newcomer_core::{NewUser, Role, UserId, UserStore};
use newcomer_server::{api, services::AuthService, state::AppState};
use newcomer_storage::LocalUserStore;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_PASSWORD: &str = "password123";

/// Router plus direct handles on its store and auth service
pub struct TestApp {
    pub router: Router,
    pub store: Arc<LocalUserStore>,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A registered account and its session token
pub struct TestUser {
    pub id: UserId,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let store = Arc::new(LocalUserStore::connect(&db_url).await.unwrap());

        let auth_service =
            Arc::new(AuthService::new(TEST_SECRET.to_string(), 1).with_bcrypt_cost(4));

        let app_state = AppState::new(store.clone(), Arc::clone(&auth_service));

        Self {
            router: api::create_router(app_state),
            store,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request, optionally with a bearer token and a JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Option<Value>) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), body).await
    }

    /// Register `username` through the API and resolve its ID
    pub async fn register(&self, username: &str) -> TestUser {
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(serde_json::json!({
                    "fullName": format!("{username} Example"),
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": TEST_PASSWORD,
                    "role": "developer",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let token = response.body["token"].as_str().unwrap().to_string();
        let me = self.get("/api/auth/me", &token).await;
        let id = UserId::new(me.body["data"]["id"].as_str().unwrap());

        TestUser { id, token }
    }

    /// Create an admin directly in the store; admins cannot self-register
    pub async fn create_admin(&self, username: &str) -> TestUser {
        let password_hash = self.auth_service.hash_password(TEST_PASSWORD).unwrap();
        let user = self
            .store
            .create_user(NewUser {
                full_name: "Site Admin".to_string(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash,
                role: Role::Admin,
            })
            .await
            .unwrap();

        let token = self.auth_service.issue_token(&user.id).unwrap().token;
        TestUser { id: user.id, token }
    }
}
