//! Route wiring, one module per resource.
//!
//! ```text
//! /health                            liveness + db probe (root level)
//!
//! /api/v1/auth/register              create account
//! /api/v1/auth/login                 obtain token pair
//! /api/v1/auth/refresh               rotate token pair
//! /api/v1/auth/logout                revoke sessions
//!
//! /api/v1/tasks                      list, create
//! /api/v1/tasks/export               CSV / JSON download
//! /api/v1/tasks/{id}                 get, update, delete
//!
//! /api/v1/categories                 list, create
//! /api/v1/categories/{id}            get, update, delete
//!
//! /api/v1/notifications/summary      due-date digest
//! ```

pub mod auth;
pub mod categories;
pub mod health;
pub mod notifications;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Everything mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tasks", tasks::router())
        .nest("/categories", categories::router())
        .nest("/notifications", notifications::router())
}
