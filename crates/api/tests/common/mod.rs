//! Shared scaffolding for the API integration tests.
//!
//! Tests drive the real service from [`vezir_api::router::app`] through
//! `tower::ServiceExt::oneshot`; no TCP listener is bound, and each test
//! gets its own database via `#[sqlx::test]`.

#![allow(dead_code)] // Not every test binary uses every helper.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vezir_api::auth::password::hash_password;
use vezir_api::config::{JwtConfig, ServerConfig};
use vezir_api::router;
use vezir_api::state::AppState;
use vezir_db::models::user::{CreateUser, User};
use vezir_db::repositories::UserRepo;

/// Fixed configuration for tests: the dev CORS origin and a known JWT
/// secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// The production service (routes plus full middleware stack) over a
/// per-test pool.
pub fn build_test_app(pool: PgPool) -> Router {
    router::app(AppState::new(pool, Arc::new(test_config())))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------
//
// Each helper consumes the app because `oneshot` does; callers rebuild
// via `build_test_app(pool.clone())` per request.

async fn dispatch(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// GET without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    dispatch(app, request).await
}

/// GET with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", bearer(token))
        .body(Body::empty())
        .unwrap();
    dispatch(app, request).await
}

/// GET with a bearer token plus extra headers, e.g. `If-None-Match`.
pub async fn get_auth_with_headers(
    app: Router,
    uri: &str,
    token: &str,
    headers: &[(&str, &str)],
) -> Response {
    let mut builder = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", bearer(token));
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    dispatch(app, builder.body(Body::empty()).unwrap()).await
}

/// Unauthenticated POST with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

/// Authenticated POST with a JSON body.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", bearer(token))
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

/// Authenticated PUT with a JSON body.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", bearer(token))
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

/// Authenticated DELETE.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("Authorization", bearer(token))
        .body(Body::empty())
        .unwrap();
    dispatch(app, request).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Collect a response body as a UTF-8 string.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response body should be valid UTF-8")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly, returning the row and the plaintext password.
pub async fn create_test_user(pool: &PgPool, email: &str) -> (User, String) {
    let password = "test_password_123";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: hashed,
        },
    )
    .await
    .expect("user creation should succeed");
    (user, password.to_string())
}

/// Log in through the API and return the access token.
pub async fn login_for_token(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"]
        .as_str()
        .expect("login response should contain access_token")
        .to_string()
}

/// Create a user and log them in; returns `(user_id, access_token)`.
pub async fn auth_user(pool: &PgPool, email: &str) -> (i64, String) {
    let (user, password) = create_test_user(pool, email).await;
    let app = build_test_app(pool.clone());
    let token = login_for_token(app, email, &password).await;
    (user.id, token)
}
