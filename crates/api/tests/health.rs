//! Service-level behaviour: the health probe, request-id propagation,
//! CORS preflight, and unknown-route handling.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

/// The probe reports the crate identity and a live database.
#[sqlx::test(migrations = "../db/migrations")]
async fn health_probe_reports_service_and_db(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "vezir-api");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

/// Paths outside the route tree fall through to axum's 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_is_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/nope/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Every response carries a generated `x-request-id` UUID.
#[sqlx::test(migrations = "../db/migrations")]
async fn responses_carry_a_request_id(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;

    let id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header should be set")
        .to_str()
        .unwrap();
    uuid::Uuid::parse_str(id).expect("x-request-id should be a UUID");
}

/// Preflight from the configured origin is admitted, with credentials.
#[sqlx::test(migrations = "../db/migrations")]
async fn cors_preflight_allows_the_dev_origin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/tasks")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    let methods = headers
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        methods.contains("GET"),
        "expected GET in allow-methods, got {methods}"
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}
