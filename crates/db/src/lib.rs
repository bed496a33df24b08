//! Database layer: connection pool, migrations, row models, and
//! repositories over PostgreSQL.

pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, health_check, run_migrations, DbPool};
