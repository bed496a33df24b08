//! Repository layer.
//!
//! Each repository is a zero-sized struct with async methods taking the
//! connection pool as their first argument. Multi-statement writes open
//! their own transactions internally.

pub mod category_repo;
pub mod session_repo;
pub mod task_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
