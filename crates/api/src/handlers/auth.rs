//! Account lifecycle: register, login, refresh, logout.
//!
//! Login and refresh both end in [`open_session`], which persists a
//! hashed refresh token and returns the token pair. Refresh rotates:
//! the presented token's session is revoked before a new one opens.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use vezir_core::error::CoreError;
use vezir_core::validation::{validate_email, validate_user_name, MIN_PASSWORD_LEN};
use vezir_db::models::session::CreateSession;
use vezir_db::models::user::{CreateUser, SafeUser, User};
use vezir_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::{issue_access_token, new_refresh_token, refresh_token_digest};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by login and refresh. Deliberately not wrapped
/// in the data envelope.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: SafeUser,
}

/// POST /api/v1/auth/register
///
/// Creates the account and returns the public user record with 201.
/// No tokens are issued here; the client follows up with a login.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, DataResponse<SafeUser>)> {
    validate_user_name(&body.name)?;

    // Stored lowercase so uq_users_email is effectively case-insensitive.
    let email = body.email.trim().to_lowercase();
    validate_email(&email)?;

    validate_password_strength(&body.password, MIN_PASSWORD_LEN)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // Friendly duplicate check; the unique constraint still backstops
    // concurrent registrations.
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&body.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            name: body.name.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, DataResponse::new(SafeUser::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Email + password in, token pair out. Unknown email and wrong
/// password produce the identical message so the response does not
/// reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = body.email.trim().to_lowercase();

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(bad_credentials)?;

    let password_ok = verify_password(&body.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !password_ok {
        return Err(bad_credentials());
    }

    Ok(Json(open_session(&state, &user).await?))
}

/// POST /api/v1/auth/refresh
///
/// Exchanges a live refresh token for a fresh pair. The old session is
/// revoked first, so a replayed token fails even if this request then
/// errors.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let digest = refresh_token_digest(&body.refresh_token);

    let session = SessionRepo::find_active_by_digest(&state.pool, &digest)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Invalid or expired refresh token".into()))?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))?;

    // Piggyback table hygiene on refresh traffic instead of running a
    // background job.
    let purged = SessionRepo::sweep_expired(&state.pool).await?;
    if purged > 0 {
        tracing::debug!(purged, "Cleaned up expired sessions");
    }

    Ok(Json(open_session(&state, &user).await?))
}

/// POST /api/v1/auth/logout
///
/// Revokes every session the caller owns and returns 204.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    SessionRepo::revoke_for_user(&state.pool, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn bad_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Issue a token pair for `user` and persist the refresh side.
async fn open_session(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;

    let access_token = issue_access_token(user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Access token signing failed: {e}")))?;

    let (refresh_token, digest) = new_refresh_token();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: digest,
            expires_at: Utc::now() + Duration::days(jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: SafeUser::from(user),
    })
}
