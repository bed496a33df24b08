//! `AppError` rendering: each variant's status, code, and client
//! message. No server involved; `IntoResponse` is called directly.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use vezir_api::error::AppError;
use vezir_core::error::CoreError;

async fn rendered(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Variants that pass their message through verbatim, and the status
/// and code each maps to.
#[tokio::test]
async fn passthrough_variants_keep_their_message() {
    let cases = [
        (
            AppError::Core(CoreError::Validation("title is required".into())),
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "title is required",
        ),
        (
            AppError::Core(CoreError::Conflict("duplicate name".into())),
            StatusCode::CONFLICT,
            "CONFLICT",
            "duplicate name",
        ),
        (
            AppError::Core(CoreError::Unauthorized("no token provided".into())),
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "no token provided",
        ),
        (
            AppError::Core(CoreError::Forbidden("not your task".into())),
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "not your task",
        ),
        (
            AppError::BadRequest("invalid field value".into()),
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "invalid field value",
        ),
    ];

    for (err, want_status, want_code, want_message) in cases {
        let (status, json) = rendered(err).await;
        assert_eq!(status, want_status);
        assert_eq!(json["code"], want_code);
        assert_eq!(json["error"], want_message);
    }
}

/// NotFound formats the entity name and id into the message.
#[tokio::test]
async fn not_found_names_the_entity() {
    let (status, json) = rendered(AppError::Core(CoreError::NotFound {
        entity: "Task",
        id: 42,
    }))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Task with id 42 not found");
}

/// Internal detail is logged, never shown: both internal variants
/// render the same generic message.
#[tokio::test]
async fn internal_detail_never_reaches_the_client() {
    for err in [
        AppError::InternalError("secret database credentials leaked".into()),
        AppError::Core(CoreError::Internal("panic stack trace here".into())),
    ] {
        let (status, json) = rendered(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");

        let raw = json.to_string();
        assert!(
            !raw.contains("secret") && !raw.contains("panic"),
            "response leaked internal detail: {raw}"
        );
    }
}

/// sqlx's RowNotFound surfaces as a plain 404.
#[tokio::test]
async fn database_row_not_found_is_404() {
    let (status, json) = rendered(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Resource not found");
}
