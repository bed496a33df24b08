//! Request handlers, one submodule per resource.
//!
//! Handlers validate input with `vezir_core`, delegate persistence to the
//! repositories in `vezir_db`, and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod categories;
pub mod export;
pub mod notifications;
pub mod tasks;
