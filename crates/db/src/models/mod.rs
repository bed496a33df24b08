//! Row models and request DTOs.
//!
//! Each submodule contains:
//! - `FromRow` entity structs matching the database rows
//! - Request DTOs and resolved write payloads for that entity

pub mod category;
pub mod session;
pub mod task;
pub mod user;
