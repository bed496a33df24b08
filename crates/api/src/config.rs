//! Environment-driven configuration.
//!
//! Read once at startup. Optional values fall back to development
//! defaults; a missing `JWT_SECRET` or an unparseable numeric is fatal,
//! on the principle that a misconfigured deploy should die before it
//! binds a port.

use std::env;

/// Read `key` from the environment, falling back to `default` when unset.
fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Everything the server needs besides `DATABASE_URL` (which the db
/// crate consumes directly).
///
/// | Variable                  | Default                 |
/// |---------------------------|-------------------------|
/// | `HOST`                    | `0.0.0.0`               |
/// | `PORT`                    | `3000`                  |
/// | `CORS_ORIGINS`            | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
/// | `JWT_SECRET`              | required                |
/// | `JWT_ACCESS_EXPIRY_MINS`  | `15`                    |
/// | `JWT_REFRESH_EXPIRY_DAYS` | `7`                     |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

/// Signing secret and lifetimes for the access/refresh token pair.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 signing secret. Must be non-empty.
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl ServerConfig {
    /// Load the full configuration, panicking on invalid values.
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
        }
    }
}

impl JwtConfig {
    /// Load the token settings, panicking when `JWT_SECRET` is absent or
    /// empty.
    pub fn from_env() -> Self {
        let secret =
            env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = env_or("JWT_ACCESS_EXPIRY_MINS", "15")
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = env_or("JWT_REFRESH_EXPIRY_DAYS", "7")
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}
