//! Repository for the `tasks` and `task_categories` tables.
//!
//! Category assignments are maintained with explicit writes inside
//! transactions: replacing assignments deletes the old join rows before
//! inserting the new set, and deleting a task clears its join rows
//! before the task row itself.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use vezir_core::types::DbId;

use crate::models::category::CategoryRef;
use crate::models::task::{
    NewTask, Task, TaskCategoryLink, TaskPatch, TaskSelection, TaskWithCategories,
};

/// One column list so every query yields the same row shape.
const COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at";

/// Data access for tasks and their category assignments.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task and its category links in one transaction.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &NewTask,
    ) -> Result<TaskWithCategories, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tasks (user_id, title, description, status, priority, due_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.due_date)
            .fetch_one(&mut *tx)
            .await?;

        replace_category_links(&mut tx, task.id, &input.category_ids).await?;

        tx.commit().await?;

        let categories = Self::categories_for_task(pool, task.id).await?;
        Ok(TaskWithCategories { task, categories })
    }

    /// List a user's tasks, newest first, with categories attached.
    pub async fn list_with_categories(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<TaskWithCategories>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC");
        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        attach_categories(pool, tasks).await
    }

    /// Find one of the user's tasks with its categories.
    pub async fn find_with_categories(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<TaskWithCategories>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        let Some(task) = task else {
            return Ok(None);
        };
        let categories = Self::categories_for_task(pool, task.id).await?;
        Ok(Some(TaskWithCategories { task, categories }))
    }

    /// Patch a task. `None` fields keep their stored values; the due date
    /// is only written when the patch flags it, so an explicit null on
    /// the wire clears it. When `category_ids` is present the whole
    /// assignment set is replaced inside the same transaction.
    ///
    /// Returns `None` when the task does not exist or belongs to someone
    /// else.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &TaskPatch,
    ) -> Result<Option<TaskWithCategories>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE tasks SET
                 title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 status = COALESCE($5, status),
                 priority = COALESCE($6, priority),
                 due_date = CASE WHEN $7 THEN $8 ELSE due_date END
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.set_due_date)
            .bind(input.due_date)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(task) = task else {
            return Ok(None);
        };

        if let Some(category_ids) = &input.category_ids {
            replace_category_links(&mut tx, task.id, category_ids).await?;
        }

        tx.commit().await?;

        let categories = Self::categories_for_task(pool, task.id).await?;
        Ok(Some(TaskWithCategories { task, categories }))
    }

    /// Delete a task: its join rows first, then the task row, in one
    /// transaction. Returns `true` when the task existed and belonged to
    /// the user.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM task_categories tc
             USING tasks t
             WHERE tc.task_id = t.id AND t.id = $1 AND t.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch tasks for an export, applying the selection's restrictions
    /// in SQL. Ordered by due date ascending; tasks without a due date
    /// come last (Postgres puts nulls last for ascending order).
    pub async fn export_selection(
        pool: &PgPool,
        user_id: DbId,
        selection: &TaskSelection,
    ) -> Result<Vec<TaskWithCategories>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = $1
               AND ($2::BIGINT[] IS NULL OR id = ANY($2))
               AND ($3::TEXT IS NULL OR status = $3)
               AND ($4::TEXT IS NULL OR priority = $4)
               AND ($5::BIGINT IS NULL OR id IN (
                   SELECT task_id FROM task_categories WHERE category_id = $5))
               AND ($6::DATE IS NULL OR due_date >= $6)
               AND ($7::DATE IS NULL OR due_date <= $7)
             ORDER BY due_date ASC"
        );
        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(&selection.task_ids)
            .bind(&selection.status)
            .bind(&selection.priority)
            .bind(selection.category_id)
            .bind(selection.due_date_from)
            .bind(selection.due_date_to)
            .fetch_all(pool)
            .await?;

        attach_categories(pool, tasks).await
    }

    /// Categories assigned to a single task, in name order.
    pub async fn categories_for_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<CategoryRef>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRef>(
            "SELECT c.id, c.name, c.color
             FROM task_categories tc
             JOIN categories c ON c.id = tc.category_id
             WHERE tc.task_id = $1
             ORDER BY c.name",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }
}

/// Replace a task's category links: delete the existing rows, then
/// insert the new set.
async fn replace_category_links(
    tx: &mut Transaction<'_, Postgres>,
    task_id: DbId,
    category_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM task_categories WHERE task_id = $1")
        .bind(task_id)
        .execute(&mut **tx)
        .await?;

    for &category_id in category_ids {
        sqlx::query("INSERT INTO task_categories (task_id, category_id) VALUES ($1, $2)")
            .bind(task_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

/// Attach category refs to a batch of task rows with one link query,
/// avoiding a per-task lookup.
async fn attach_categories(
    pool: &PgPool,
    tasks: Vec<Task>,
) -> Result<Vec<TaskWithCategories>, sqlx::Error> {
    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = tasks.iter().map(|t| t.id).collect();
    let links = sqlx::query_as::<_, TaskCategoryLink>(
        "SELECT tc.task_id, c.id, c.name, c.color
         FROM task_categories tc
         JOIN categories c ON c.id = tc.category_id
         WHERE tc.task_id = ANY($1)
         ORDER BY c.name",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_task: HashMap<DbId, Vec<CategoryRef>> = HashMap::new();
    for link in links {
        by_task.entry(link.task_id).or_default().push(CategoryRef {
            id: link.id,
            name: link.name,
            color: link.color,
        });
    }

    Ok(tasks
        .into_iter()
        .map(|task| {
            let categories = by_task.remove(&task.id).unwrap_or_default();
            TaskWithCategories { task, categories }
        })
        .collect())
}
