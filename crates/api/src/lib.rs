//! HTTP layer of the Vezir task backend.
//!
//! Everything the binary needs is public here so the integration tests
//! can assemble the same service via [`router::app`].

pub mod auth;
pub mod caching;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
