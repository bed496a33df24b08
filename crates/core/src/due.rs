//! Due-date classification.
//!
//! Places a task's due date into an urgency bucket relative to a caller
//! supplied reference day, so classification is deterministic and
//! testable. Completed tasks and tasks without a due date never raise
//! urgency flags.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::task::STATUS_DONE;

/// Urgency bucket for a due date. Serialized in kebab-case
/// (`"due-this-week"` etc.) for API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DueBucket {
    NoDueDate,
    Overdue,
    DueToday,
    DueTomorrow,
    DueThisWeek,
    DueFuture,
}

impl DueBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DueBucket::NoDueDate => "no-due-date",
            DueBucket::Overdue => "overdue",
            DueBucket::DueToday => "due-today",
            DueBucket::DueTomorrow => "due-tomorrow",
            DueBucket::DueThisWeek => "due-this-week",
            DueBucket::DueFuture => "due-future",
        }
    }
}

/// Full classification of a task's due date relative to a reference day.
///
/// The boolean flags are what the bucket precedence is derived from;
/// `is_due_this_week` stays true for tasks due today or tomorrow even
/// though their bucket is the more urgent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueDateStatus {
    pub bucket: DueBucket,
    pub is_overdue: bool,
    pub is_due_today: bool,
    pub is_due_tomorrow: bool,
    pub is_due_this_week: bool,
    /// Signed whole-day distance from the reference day to the due date.
    /// `None` when the task has no due date or is completed.
    pub days_until_due: Option<i64>,
}

impl DueDateStatus {
    /// Classification for tasks without an actionable due date.
    fn inert() -> Self {
        Self {
            bucket: DueBucket::NoDueDate,
            is_overdue: false,
            is_due_today: false,
            is_due_tomorrow: false,
            is_due_this_week: false,
            days_until_due: None,
        }
    }
}

/// The last day of the current week: the upcoming Sunday, or a full week
/// out when `today` is itself a Sunday.
pub fn end_of_week(today: NaiveDate) -> NaiveDate {
    let days_left = 7 - i64::from(today.weekday().num_days_from_sunday());
    today + Duration::days(days_left)
}

/// Classify `due_date` against `today`.
///
/// Bucket precedence: overdue, due today, due tomorrow, due this week,
/// due in the future. A completed task classifies as `NoDueDate` with
/// every flag cleared regardless of its date.
pub fn classify(due_date: Option<NaiveDate>, status: &str, today: NaiveDate) -> DueDateStatus {
    let Some(due) = due_date else {
        return DueDateStatus::inert();
    };
    if status == STATUS_DONE {
        return DueDateStatus::inert();
    }

    let tomorrow = today + Duration::days(1);
    let week_end = end_of_week(today);
    let days_until_due = (due - today).num_days();

    let is_overdue = due < today;
    let is_due_today = due == today;
    let is_due_tomorrow = due == tomorrow;
    let is_due_this_week = due >= today && due <= week_end;

    let bucket = if is_overdue {
        DueBucket::Overdue
    } else if is_due_today {
        DueBucket::DueToday
    } else if is_due_tomorrow {
        DueBucket::DueTomorrow
    } else if is_due_this_week {
        DueBucket::DueThisWeek
    } else {
        DueBucket::DueFuture
    };

    DueDateStatus {
        bucket,
        is_overdue,
        is_due_today,
        is_due_tomorrow,
        is_due_this_week,
        days_until_due: Some(days_until_due),
    }
}

/// Human-readable label for a classified due date, e.g. `"Overdue by 3
/// days"` or `"Due tomorrow"`. Dates outside the urgency window (and
/// dated but completed tasks) render as `"Due YYYY-MM-DD"`.
pub fn due_date_label(due: NaiveDate, status: &DueDateStatus) -> String {
    match status.bucket {
        DueBucket::Overdue => {
            let days = status.days_until_due.unwrap_or(0).abs();
            let unit = if days == 1 { "day" } else { "days" };
            format!("Overdue by {days} {unit}")
        }
        DueBucket::DueToday => "Due today".to_string(),
        DueBucket::DueTomorrow => "Due tomorrow".to_string(),
        DueBucket::DueThisWeek => {
            let days = status.days_until_due.unwrap_or(0);
            format!("Due in {days} days")
        }
        DueBucket::DueFuture | DueBucket::NoDueDate => format!("Due {}", due.format("%Y-%m-%d")),
    }
}
