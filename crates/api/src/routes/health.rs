//! `GET /health`, mounted at the root so load balancers skip the API
//! prefix.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// What the probe reports.
#[derive(Serialize)]
pub struct HealthStatus {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// Liveness plus a database round-trip. Always 200; orchestrators read
/// the body to distinguish degraded from healthy.
async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let db_healthy = vezir_db::health_check(&state.pool).await.is_ok();

    Json(HealthStatus {
        status: if db_healthy { "ok" } else { "degraded" },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
