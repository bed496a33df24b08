//! Extractor-based middleware; see [`auth::AuthUser`].

pub mod auth;
