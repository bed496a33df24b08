//! Pure domain logic for the Vezir task manager.
//!
//! Everything in this crate operates on plain data with no I/O, so the
//! same functions back the HTTP handlers, the repositories, and unit
//! tests. Database access and HTTP concerns live in `vezir-db` and
//! `vezir-api` respectively.

pub mod due;
pub mod error;
pub mod export;
pub mod notifications;
pub mod ordering;
pub mod task;
pub mod types;
pub mod validation;
