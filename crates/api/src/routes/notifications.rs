//! `/notifications` wiring.

use axum::routing::get;
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(notifications::notification_summary))
}
