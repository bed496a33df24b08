//! Refresh-token sessions.

use sqlx::FromRow;
use vezir_core::types::{DbId, Timestamp};

/// One `user_sessions` row; a user holds one per outstanding refresh
/// token.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    /// SHA-256 hash of the refresh token; the plaintext is never stored.
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
