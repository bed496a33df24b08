//! Access-token signing and refresh-token material.
//!
//! Access tokens are short-lived HS256 JWTs. Refresh tokens are opaque
//! random strings; the server keeps only their SHA-256 digest, so a
//! leaked sessions table cannot be replayed.

use chrono::Utc;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use vezir_core::types::DbId;

use crate::config::JwtConfig;

/// Claims carried by every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's database id.
    pub sub: DbId,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Per-token UUID, available for audit trails.
    pub jti: String,
}

impl Claims {
    fn new(user_id: DbId, ttl_mins: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            exp: now + ttl_mins * 60,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Sign a fresh access token for `user_id`. The default header and
/// validation mean HS256 throughout.
pub fn issue_access_token(user_id: DbId, jwt: &JwtConfig) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, jwt.access_token_expiry_mins);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )
}

/// Check signature and expiry, returning the embedded [`Claims`].
pub fn decode_access_token(token: &str, jwt: &JwtConfig) -> Result<Claims, JwtError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_bytes()),
        &Validation::default(), // checks exp, with leeway
    )?;
    Ok(data.claims)
}

/// Mint an opaque refresh token as `(plaintext, digest)`.
///
/// The plaintext goes to the client once; only the digest is persisted.
pub fn new_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = refresh_token_digest(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a refresh token, for storage and lookup.
pub fn refresh_token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
