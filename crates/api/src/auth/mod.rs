//! Credential handling: [`password`] hashing and [`jwt`] token material.

pub mod jwt;
pub mod password;
