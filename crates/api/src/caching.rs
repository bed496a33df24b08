//! ETag-based conditional responses for read endpoints.
//!
//! Single-resource and list GET endpoints return an `ETag` derived from the
//! serialized body plus a short-lived private `Cache-Control`. Clients that
//! replay the ETag via `If-None-Match` get `304 Not Modified` with an empty
//! body instead of the full payload.

use axum::http::header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Cache policy attached to cacheable GET responses.
///
/// Private because every payload is scoped to the authenticated user.
pub const CACHE_CONTROL_VALUE: &str = "private, max-age=300, stale-while-revalidate=60";

/// Compute the ETag for a response body.
///
/// The tag is the base64 of the canonical JSON serialization, so any change
/// to the payload (field order is fixed by the struct definitions) produces
/// a different tag.
pub fn etag_for<T: Serialize>(body: &T) -> Result<String, AppError> {
    let bytes = serde_json::to_vec(body)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize response: {e}")))?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// Serve `body` as JSON with ETag / Cache-Control headers, honoring
/// `If-None-Match` from the request.
///
/// A matching `If-None-Match` short-circuits to an empty `304 Not Modified`.
pub fn cached_json<T: Serialize>(headers: &HeaderMap, body: T) -> AppResult<Response> {
    let etag = etag_for(&body)?;

    if let Some(candidate) = headers.get(IF_NONE_MATCH).and_then(|v| v.to_str().ok()) {
        if candidate == etag {
            return Ok(StatusCode::NOT_MODIFIED.into_response());
        }
    }

    Ok((
        [(ETAG, etag), (CACHE_CONTROL, CACHE_CONTROL_VALUE.to_string())],
        Json(body),
    )
        .into_response())
}
