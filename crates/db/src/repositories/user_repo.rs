//! Lookup and insert queries for the `users` table.

use sqlx::PgPool;
use vezir_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// One column list so every query yields the same row shape.
const COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

/// Data access for `users`.
pub struct UserRepo;

impl UserRepo {
    /// Persist a new user and return the stored row.
    ///
    /// A duplicate email violates `uq_users_email` and surfaces as a
    /// database error the API layer maps to 409.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Callers normalize the email to lowercase
    /// before storing and looking up.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
