//! Request authentication via an extractor.
//!
//! Handlers that take an [`AuthUser`] parameter only run for requests
//! carrying a valid `Authorization: Bearer <jwt>` header; everything
//! else is rejected with 401 before the handler body executes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vezir_core::error::CoreError;
use vezir_core::types::DbId;

use crate::auth::jwt::decode_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller's identity, proven by their access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// Database id from the token's `sub` claim.
    pub user_id: DbId,
}

/// Pull the bearer token out of the `Authorization` header, with the
/// exact messages clients key their login-redirect logic on.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = decode_access_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
