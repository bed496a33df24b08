//! Handler for the due-date notifications digest.

use axum::extract::State;
use axum::response::IntoResponse;
use vezir_core::notifications::build_summary;
use vezir_core::task::TaskView;
use vezir_db::repositories::TaskRepo;

use crate::error::AppResult;
use crate::handlers::tasks::today;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications/summary
///
/// The due-date digest: the user's active tasks grouped into urgency
/// buckets, plus headline counts over the whole task list.
pub async fn notification_summary(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tasks = TaskRepo::list_with_categories(&state.pool, auth.user_id).await?;

    // Category membership is irrelevant to the digest.
    let views: Vec<TaskView<'_>> = tasks
        .iter()
        .map(|t| TaskView {
            id: t.task.id,
            title: &t.task.title,
            description: t.task.description.as_deref(),
            status: &t.task.status,
            priority: &t.task.priority,
            due_date: t.task.due_date,
            created_at: t.task.created_at,
            category_ids: &[],
        })
        .collect();

    let summary = build_summary(&views, today());

    Ok(DataResponse::new(summary))
}
