#![allow(dead_code)]

//! Test infrastructure for tp-server API tests

use tp_config::{Config, OAuthClientConfig, OAuthConfig};
use tp_server::AppState;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-at-least-32-characters";

/// Create a test pool with in-memory SQLite.
///
/// One connection only: every `:memory:` connection is its own database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    tp_db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_config(oauth: OAuthConfig) -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = Some(TEST_JWT_SECRET.to_string());
    // Cheapest cost bcrypt accepts
    config.auth.bcrypt_cost = 4;
    config.oauth = oauth;
    config
}

/// AppState with no OAuth provider configured
pub async fn create_test_app_state() -> AppState {
    create_test_app_state_with(OAuthConfig::default()).await
}

pub async fn create_test_app_state_with(oauth: OAuthConfig) -> AppState {
    let pool = create_test_pool().await;
    AppState::from_config(pool, &test_config(oauth)).expect("Failed to build app state")
}

/// Provider client whose endpoints all live on `base_url` (a mock server)
pub fn mock_provider(base_url: &str, provider: &str) -> OAuthClientConfig {
    OAuthClientConfig {
        client_id: Some(format!("{provider}-client")),
        client_secret: Some(format!("{provider}-secret")),
        redirect_uri: Some(format!(
            "http://localhost:5000/api/auth/{provider}/callback"
        )),
        authorize_url: Some(format!("{base_url}/authorize")),
        token_url: Some(format!("{base_url}/token")),
        userinfo_url: Some(format!("{base_url}/userinfo")),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: serde_json::Value,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get("location")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    TestResponse {
        status,
        headers,
        json,
    }
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

/// Sign up through the router and return `(token, userId)`
pub async fn sign_up(state: &AppState, email: &str, password: &str) -> (String, String) {
    let response = send(
        tp_server::build_router(state.clone()),
        post_json(
            "/api/auth/signup",
            serde_json::json!({ "name": "Test User", "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.json);

    (
        response.json["token"].as_str().unwrap().to_string(),
        response.json["userId"].as_str().unwrap().to_string(),
    )
}
