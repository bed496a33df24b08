//! Handlers for the `/tasks` resource.
//!
//! Tasks are strictly user-scoped: every query is keyed by the
//! authenticated user's id, so another user's task ids behave exactly
//! like missing ones (404, never 403).

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use vezir_core::due::{classify, due_date_label, DueDateStatus};
use vezir_core::error::CoreError;
use vezir_core::ordering::{select_tasks, validate_status_filter, SortKey, TaskFilter};
use vezir_core::task::{
    validate_priority, validate_status, TaskView, DEFAULT_PRIORITY, DEFAULT_STATUS,
};
use vezir_core::types::{DbId, Timestamp};
use vezir_core::validation::{validate_description, validate_title};
use vezir_db::models::category::CategoryRef;
use vezir_db::models::task::{CreateTask, NewTask, TaskPatch, TaskWithCategories, UpdateTask};
use vezir_db::repositories::{CategoryRepo, TaskRepo};

use crate::caching::cached_json;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tasks`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
    /// A concrete status, `ACTIVE`, or `ALL`.
    pub status: Option<String>,
    pub category_id: Option<DbId>,
    /// `newest` (default), `oldest`, `dueDate`, or `title`.
    pub sort: Option<String>,
    /// Group by priority (URGENT first) before applying the sort key.
    pub priority_first: Option<bool>,
}

/// A task as returned by the API: the stored columns plus assigned
/// categories and the derived due-date classification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub categories: Vec<CategoryRef>,
    pub due_status: DueDateStatus,
    /// Display label such as `"Due tomorrow"`; absent without a due date.
    pub due_label: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks
///
/// List the authenticated user's tasks with the filter and sort
/// parameters applied.
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status_filter(status)?;
    }
    let sort = match params.sort.as_deref() {
        Some(value) => SortKey::parse(value)?,
        None => SortKey::default(),
    };
    let priority_first = params.priority_first.unwrap_or(false);

    let tasks = TaskRepo::list_with_categories(&state.pool, auth.user_id).await?;

    // Borrowed views over the fetched rows for the filter/sort engine.
    let category_ids: Vec<Vec<DbId>> = tasks
        .iter()
        .map(|t| t.categories.iter().map(|c| c.id).collect())
        .collect();
    let views: Vec<TaskView<'_>> = tasks
        .iter()
        .zip(category_ids.iter())
        .map(|(t, ids)| TaskView {
            id: t.task.id,
            title: &t.task.title,
            description: t.task.description.as_deref(),
            status: &t.task.status,
            priority: &t.task.priority,
            due_date: t.task.due_date,
            created_at: t.task.created_at,
            category_ids: ids,
        })
        .collect();

    let filter = TaskFilter {
        search: params.search,
        status: params.status,
        category_id: params.category_id,
    };
    let selected = select_tasks(&views, &filter, sort, priority_first);

    // The views borrow from `tasks`; release them before consuming the rows.
    drop(views);
    let reference = today();
    let mut slots: Vec<Option<TaskWithCategories>> = tasks.into_iter().map(Some).collect();
    let data: Vec<TaskPayload> = selected
        .into_iter()
        .filter_map(|i| slots[i].take())
        .map(|t| task_payload(t, reference))
        .collect();

    Ok(DataResponse::new(data))
}

/// POST /api/v1/tasks
///
/// Create a task for the authenticated user, optionally assigning
/// categories. Returns 201 with the created task.
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    if let Some(description) = input.description.as_deref() {
        validate_description(description)?;
    }

    let status = match input.status {
        Some(status) => {
            validate_status(&status)?;
            status
        }
        None => DEFAULT_STATUS.to_string(),
    };
    let priority = match input.priority {
        Some(priority) => {
            validate_priority(&priority)?;
            priority
        }
        None => DEFAULT_PRIORITY.to_string(),
    };

    let category_ids = input.category_ids.unwrap_or_default();
    ensure_categories_owned(&state, auth.user_id, &category_ids).await?;

    let new_task = NewTask {
        title: input.title.trim().to_string(),
        description: input.description,
        status,
        priority,
        due_date: input.due_date,
        category_ids,
    };

    let task = TaskRepo::create(&state.pool, auth.user_id, &new_task).await?;

    tracing::info!(task_id = task.task.id, user_id = auth.user_id, "Task created");

    Ok((
        StatusCode::CREATED,
        DataResponse::new(task_payload(task, today())),
    ))
}

/// GET /api/v1/tasks/{id}
///
/// Fetch a single task. Supports conditional requests via `If-None-Match`.
pub async fn get_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let task = TaskRepo::find_with_categories(&state.pool, auth.user_id, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    cached_json(&headers, DataResponse::new(task_payload(task, today())))
}

/// PUT /api/v1/tasks/{id}
///
/// Partial update: omitted fields keep their stored values, an explicit
/// `"dueDate": null` clears the date, and a present `categoryIds`
/// replaces the whole assignment set.
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = input.title.as_deref() {
        validate_title(title)?;
    }
    if let Some(description) = input.description.as_deref() {
        validate_description(description)?;
    }
    if let Some(status) = input.status.as_deref() {
        validate_status(status)?;
    }
    if let Some(priority) = input.priority.as_deref() {
        validate_priority(priority)?;
    }
    if let Some(category_ids) = input.category_ids.as_deref() {
        ensure_categories_owned(&state, auth.user_id, category_ids).await?;
    }

    let patch = TaskPatch {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description,
        status: input.status,
        priority: input.priority,
        set_due_date: input.due_date.is_some(),
        due_date: input.due_date.flatten(),
        category_ids: input.category_ids,
    };

    let task = TaskRepo::update(&state.pool, auth.user_id, task_id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    tracing::info!(task_id, user_id = auth.user_id, "Task updated");

    Ok(DataResponse::new(task_payload(task, today())))
}

/// DELETE /api/v1/tasks/{id}
///
/// Delete a task and its category links. Returns 204 No Content.
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TaskRepo::delete(&state.pool, auth.user_id, task_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }));
    }

    tracing::info!(task_id, user_id = auth.user_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The server's current calendar day, anchoring all due-date math.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Assemble the response payload for one task.
pub(crate) fn task_payload(source: TaskWithCategories, today: NaiveDate) -> TaskPayload {
    let TaskWithCategories { task, categories } = source;
    let due_status = classify(task.due_date, &task.status, today);
    let due_label = task.due_date.map(|due| due_date_label(due, &due_status));

    TaskPayload {
        id: task.id,
        title: task.title,
        description: task.description,
        status: task.status,
        priority: task.priority,
        due_date: task.due_date,
        categories,
        due_status,
        due_label,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

/// Verify every category id exists and belongs to the user.
async fn ensure_categories_owned(
    state: &AppState,
    user_id: DbId,
    category_ids: &[DbId],
) -> AppResult<()> {
    if category_ids.is_empty() {
        return Ok(());
    }
    let owned = CategoryRepo::count_owned(&state.pool, user_id, category_ids).await?;
    if owned as usize != category_ids.len() {
        return Err(AppError::Core(CoreError::Validation(
            "Some categories do not exist or don't belong to you".into(),
        )));
    }
    Ok(())
}
