//! Repository for the `categories` table.
//!
//! Every query scopes by `user_id`, so another user's categories behave
//! exactly like rows that do not exist.

use sqlx::PgPool;
use vezir_core::types::DbId;

use crate::models::category::{Category, CategoryDelete, CategoryWithCount};

/// One column list so every query yields the same row shape.
const COLUMNS: &str = "id, user_id, name, color, created_at, updated_at";

/// Column list for queries that also aggregate the task count.
const COUNT_COLUMNS: &str =
    "c.id, c.user_id, c.name, c.color, COUNT(tc.task_id) AS task_count, c.created_at, c.updated_at";

/// Data access for `categories`.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Persist a new category and return the stored row.
    ///
    /// A duplicate name for the same user violates
    /// `uq_categories_user_id_name` and surfaces as a database error the
    /// API layer maps to 409.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
        color: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (user_id, name, color)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .bind(name)
            .bind(color)
            .fetch_one(pool)
            .await
    }

    /// List the user's categories with task counts, in name order.
    pub async fn list_with_counts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {COUNT_COLUMNS}
             FROM categories c
             LEFT JOIN task_categories tc ON tc.category_id = c.id
             WHERE c.user_id = $1
             GROUP BY c.id
             ORDER BY c.name ASC"
        );
        sqlx::query_as::<_, CategoryWithCount>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find one of the user's categories with its task count.
    pub async fn find_with_count(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<CategoryWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {COUNT_COLUMNS}
             FROM categories c
             LEFT JOIN task_categories tc ON tc.category_id = c.id
             WHERE c.user_id = $1 AND c.id = $2
             GROUP BY c.id"
        );
        sqlx::query_as::<_, CategoryWithCount>(&query)
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count how many of `ids` exist and belong to the user. Used to
    /// validate task category assignments before writing them.
    pub async fn count_owned(
        pool: &PgPool,
        user_id: DbId,
        ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(ids)
        .fetch_one(pool)
        .await
    }

    /// Update a category's name and color, returning the refreshed row
    /// with its task count. A single statement keeps the ownership check
    /// and write atomic.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        name: &str,
        color: &str,
    ) -> Result<Option<CategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCount>(
            "UPDATE categories SET name = $3, color = $4
             WHERE id = $1 AND user_id = $2
             RETURNING id, user_id, name, color,
                 (SELECT COUNT(*) FROM task_categories WHERE category_id = categories.id)
                     AS task_count,
                 created_at, updated_at",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(color)
        .fetch_optional(pool)
        .await
    }

    /// Delete a category unless tasks still reference it.
    ///
    /// The ownership check, the reference count, and the delete run in
    /// one transaction so a concurrent assignment cannot slip between
    /// the count and the delete.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<CategoryDelete, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owned: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Ok(CategoryDelete::NotFound);
        }

        let task_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM task_categories WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if task_count > 0 {
            return Ok(CategoryDelete::InUse { task_count });
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CategoryDelete::Deleted)
    }
}
