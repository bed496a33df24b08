//! Task status and priority domains, and the borrowed task view the
//! engines operate on.
//!
//! Statuses and priorities travel as plain strings and are validated
//! against these constants at the API boundary; the same values are
//! enforced by CHECK constraints in the schema.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Task has not been started.
pub const STATUS_TODO: &str = "TODO";

/// Task is being worked on.
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";

/// Task is finished.
pub const STATUS_DONE: &str = "DONE";

/// All valid task statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_TODO, STATUS_IN_PROGRESS, STATUS_DONE];

/// Status assigned to new tasks when none is given.
pub const DEFAULT_STATUS: &str = STATUS_TODO;

// ---------------------------------------------------------------------------
// Priorities
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "LOW";
pub const PRIORITY_MEDIUM: &str = "MEDIUM";
pub const PRIORITY_HIGH: &str = "HIGH";
pub const PRIORITY_URGENT: &str = "URGENT";

/// All valid task priorities, lowest first.
pub const VALID_PRIORITIES: &[&str] =
    &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH, PRIORITY_URGENT];

/// Priority assigned to new tasks when none is given.
pub const DEFAULT_PRIORITY: &str = PRIORITY_MEDIUM;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a task status value.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate a task priority value.
pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Numeric rank for priority ordering. Higher ranks sort first; unknown
/// values rank below LOW.
pub fn priority_rank(priority: &str) -> i32 {
    match priority {
        PRIORITY_URGENT => 4,
        PRIORITY_HIGH => 3,
        PRIORITY_MEDIUM => 2,
        PRIORITY_LOW => 1,
        _ => 0,
    }
}

/// A task counts as active until it is completed.
pub fn is_active_status(status: &str) -> bool {
    status == STATUS_TODO || status == STATUS_IN_PROGRESS
}

/// Borrowed snapshot of a task, the unit the filtering, ordering, and
/// notification engines work on. Built by the API layer from database
/// rows; the engines never see the rows themselves.
#[derive(Debug, Clone, Copy)]
pub struct TaskView<'a> {
    pub id: DbId,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub priority: &'a str,
    pub due_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    /// Ids of the categories assigned to this task.
    pub category_ids: &'a [DbId],
}
