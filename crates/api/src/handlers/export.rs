//! Handler for `/tasks/export` (CSV and JSON downloads).

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use vezir_core::error::CoreError;
use vezir_core::export::{
    build_rows, csv_file_name, render_csv, DateRange, ExportFilters, ExportFormat, ExportInfo,
    ExportMethod, ExportPayload, ExportSource, FILTER_ALL,
};
use vezir_core::types::DbId;
use vezir_db::models::task::{TaskSelection, TaskWithCategories};
use vezir_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::tasks::today;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /tasks/export`. Everything arrives as
/// strings; parsing happens per export method.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    /// `csv` or `json` (default `json`).
    pub format: Option<String>,
    /// `selected`, `filtered` (default), or `all`.
    pub export_method: Option<String>,
    /// Comma-separated task ids for the `selected` method.
    pub task_ids: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/v1/tasks/export
///
/// Export tasks as a CSV download or a JSON payload with export
/// metadata. The `selected` method restricts to an id list, `filtered`
/// applies status/priority/category/date-range restrictions, and `all`
/// exports everything.
pub async fn export_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> AppResult<Response> {
    let format = match params.format.as_deref() {
        Some(value) => ExportFormat::parse(value)?,
        None => ExportFormat::default(),
    };
    let method = match params.export_method.as_deref() {
        Some(value) => ExportMethod::parse(value)?,
        None => ExportMethod::default(),
    };

    let selection = build_selection(method, &params)?;
    let tasks = TaskRepo::export_selection(&state.pool, auth.user_id, &selection).await?;

    let reference = today();
    let sources: Vec<ExportSource<'_>> = tasks.iter().map(export_source).collect();
    let rows = build_rows(&sources, reference);
    let total_tasks = rows.len();

    tracing::info!(
        user_id = auth.user_id,
        method = method.as_str(),
        tasks = total_tasks,
        "Tasks exported"
    );

    match format {
        ExportFormat::Csv => {
            let body = render_csv(&rows);
            let file_name = csv_file_name(method, reference, rows.is_empty());
            Ok((
                [
                    (CONTENT_TYPE, "text/csv".to_string()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{file_name}\""),
                    ),
                ],
                body,
            )
                .into_response())
        }
        ExportFormat::Json => {
            // The metadata echoes the filter inputs verbatim (nulls kept)
            // for the `filtered` method and the id list for `selected`.
            let filters = (method == ExportMethod::Filtered).then(|| ExportFilters {
                status: params.status.clone(),
                priority: params.priority.clone(),
                category_id: params.category_id.clone(),
                date_range: DateRange {
                    start_date: params.start_date.clone(),
                    end_date: params.end_date.clone(),
                },
            });
            let selected_task_ids = (method == ExportMethod::Selected)
                .then(|| selection.task_ids.clone().unwrap_or_default());

            let payload = ExportPayload {
                tasks: rows,
                export_info: ExportInfo {
                    exported_at: Utc::now(),
                    total_tasks,
                    export_method: method.as_str(),
                    filters,
                    selected_task_ids,
                },
            };

            Ok(Json(payload).into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Translate the query parameters into the SQL-side restriction set for
/// the chosen method.
fn build_selection(method: ExportMethod, params: &ExportQuery) -> AppResult<TaskSelection> {
    match method {
        ExportMethod::Selected => {
            let ids = parse_task_ids(params.task_ids.as_deref().unwrap_or_default())?;
            // An empty id list means no restriction, like the other methods.
            Ok(TaskSelection {
                task_ids: (!ids.is_empty()).then_some(ids),
                ..TaskSelection::default()
            })
        }
        ExportMethod::Filtered => Ok(TaskSelection {
            status: constrained(params.status.as_deref()),
            priority: constrained(params.priority.as_deref()),
            category_id: params
                .category_id
                .as_deref()
                .filter(|v| !v.is_empty() && *v != FILTER_ALL)
                .map(|v| parse_id("categoryId", v))
                .transpose()?,
            due_date_from: params
                .start_date
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| parse_date("startDate", v))
                .transpose()?,
            due_date_to: params
                .end_date
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| parse_date("endDate", v))
                .transpose()?,
            ..TaskSelection::default()
        }),
        ExportMethod::All => Ok(TaskSelection::default()),
    }
}

/// A status/priority value constrains the export only when non-empty
/// and not `ALL`. Unknown values pass through and simply match nothing.
fn constrained(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && *v != FILTER_ALL)
        .map(str::to_string)
}

/// Parse a comma-separated id list, ignoring blank segments.
fn parse_task_ids(raw: &str) -> AppResult<Vec<DbId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_id("taskIds", s))
        .collect()
}

fn parse_id(field: &str, raw: &str) -> AppResult<DbId> {
    raw.parse().map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid {field} value '{raw}'"
        )))
    })
}

fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Expected YYYY-MM-DD"
        )))
    })
}

/// Borrow one fetched row as export input.
fn export_source(task: &TaskWithCategories) -> ExportSource<'_> {
    ExportSource {
        id: task.task.id,
        title: &task.task.title,
        description: task.task.description.as_deref(),
        status: &task.task.status,
        priority: &task.task.priority,
        due_date: task.task.due_date,
        created_at: task.task.created_at,
        updated_at: task.task.updated_at,
        category_names: task.categories.iter().map(|c| c.name.as_str()).collect(),
    }
}
