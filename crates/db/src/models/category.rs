//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vezir_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Category {
    /// Attach a task count to a bare row.
    pub fn with_count(self, task_count: i64) -> CategoryWithCount {
        CategoryWithCount {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            color: self.color,
            task_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A category together with the number of tasks assigned to it.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub color: String,
    pub task_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lightweight category info embedded in task responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    pub color: String,
}

/// Outcome of a category delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDelete {
    /// Row removed.
    Deleted,
    /// No category with that id belongs to the user.
    NotFound,
    /// Tasks still reference the category; nothing was deleted.
    InUse { task_count: i64 },
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Request body for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    /// Defaults to `#3b82f6` when omitted.
    pub color: Option<String>,
}

/// Request body for updating a category. Name and color are both
/// required; the category editor always submits the full form.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: String,
    pub color: String,
}
