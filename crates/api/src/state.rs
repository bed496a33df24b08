use std::sync::Arc;

use vezir_db::DbPool;

use crate::config::ServerConfig;

/// State threaded through every handler via `State<AppState>`.
///
/// Cloned per request; both fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Arc<ServerConfig>) -> Self {
        Self { pool, config }
    }
}
