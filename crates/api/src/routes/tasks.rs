//! `/tasks` wiring. The export download lives here too, registered
//! before the `/{id}` capture so "export" is never parsed as an id.

use axum::routing::get;
use axum::Router;

use crate::handlers::{export, tasks};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/export", get(export::export_tasks))
        .route(
            "/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
}
