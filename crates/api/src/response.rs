//! The `{ "data": ... }` response envelope.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Envelope for resource payloads, serialized as `{ "data": T }`.
///
/// Token endpoints and file exports return bespoke bodies and bypass
/// it; everything else goes through here so clients can unwrap one
/// shape.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
