//! HTTP error mapping.
//!
//! Every failure a handler can produce funnels into [`AppError`], which
//! renders as `{ "error": <message>, "code": <CODE> }`. Internal and
//! database failures are logged with detail but reach clients as a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vezir_core::error::CoreError;

/// Error type returned by every handler.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain error from `vezir_core`; carries its own classification.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Anything sqlx reports.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request input caught at the HTTP layer.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unexpected server-side failure.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const SANITIZED: &str = "An internal error occurred";

/// Log the real failure, hand the client the generic 500 payload.
fn hide(detail: impl std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "Internal failure hidden from client");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        SANITIZED.to_string(),
    )
}

impl AppError {
    /// Map to `(status, code, client-visible message)`.
    fn render(&self) -> (StatusCode, &'static str, String) {
        use CoreError::*;

        match self {
            AppError::Core(NotFound { entity, id }) => {
                let message = format!("{entity} with id {id} not found");
                (StatusCode::NOT_FOUND, "NOT_FOUND", message)
            }
            AppError::Core(Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(Conflict(msg)) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Core(Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(Forbidden(msg)) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Core(Internal(msg)) => hide(msg),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => hide(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.render();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Turn a sqlx error into a client-safe triple.
///
/// `RowNotFound` becomes 404. A Postgres 23505 on one of our `uq_`
/// constraints becomes 409 with the constraint name, so clients can tell
/// which uniqueness rule they tripped. Everything else is a sanitized
/// 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        let message = "Resource not found".to_string();
        return (StatusCode::NOT_FOUND, "NOT_FOUND", message);
    }

    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
        }
    }

    hide(err)
}
