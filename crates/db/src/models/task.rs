//! Task entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use sqlx::FromRow;
use vezir_core::types::{DbId, Timestamp};

use crate::models::category::CategoryRef;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task with its assigned categories resolved.
#[derive(Debug, Clone)]
pub struct TaskWithCategories {
    pub task: Task,
    pub categories: Vec<CategoryRef>,
}

/// One task-to-category link row joined with the category columns, used
/// to attach categories to a batch of tasks in a single query.
#[derive(Debug, Clone, FromRow)]
pub struct TaskCategoryLink {
    pub task_id: DbId,
    pub id: DbId,
    pub name: String,
    pub color: String,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Request body for creating a task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `TODO`.
    pub status: Option<String>,
    /// Defaults to `MEDIUM`.
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Categories to assign; each must belong to the task's owner.
    pub category_ids: Option<Vec<DbId>>,
}

/// Request body for updating a task. Omitted fields keep their stored
/// values. `due_date` distinguishes omitted (unchanged) from an explicit
/// `null` (clear the date); `category_ids`, when present, replaces the
/// whole assignment set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    pub category_ids: Option<Vec<DbId>>,
}

/// Deserialize a field where absence and an explicit `null` mean
/// different things: absent stays `None`, `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Resolved write payloads
// ---------------------------------------------------------------------------

/// Fully resolved insert payload: defaults applied and values validated
/// by the handler before it reaches the repository.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub category_ids: Vec<DbId>,
}

/// Resolved update payload. `due_date` is only written when
/// `set_due_date` is true, so a `None` there clears the stored date.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub set_due_date: bool,
    pub due_date: Option<NaiveDate>,
    pub category_ids: Option<Vec<DbId>>,
}

/// SQL-side restriction set for task exports. `None` fields impose no
/// constraint; all present restrictions apply together.
#[derive(Debug, Clone, Default)]
pub struct TaskSelection {
    pub task_ids: Option<Vec<DbId>>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<DbId>,
    pub due_date_from: Option<NaiveDate>,
    pub due_date_to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_task_distinguishes_absent_from_null_due_date() {
        let absent: UpdateTask = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(absent.due_date, None);

        let cleared: UpdateTask = serde_json::from_str(r#"{"dueDate": null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: UpdateTask = serde_json::from_str(r#"{"dueDate": "2024-03-01"}"#).unwrap();
        assert_eq!(
            set.due_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1))
        );
    }
}
