//! Due-date notification digest.
//!
//! Groups a user's active tasks into urgency buckets and derives the
//! headline counts for the notifications dashboard. A task lands in at
//! most one bucket; the this-week bucket deliberately excludes tasks
//! already reported as due today or tomorrow.

use chrono::NaiveDate;
use serde::Serialize;

use crate::due::{classify, due_date_label, DueBucket, DueDateStatus};
use crate::task::{is_active_status, TaskView, PRIORITY_URGENT, STATUS_DONE};
use crate::types::DbId;

/// One task surfaced in a digest bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAlert {
    pub id: DbId,
    pub title: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub bucket: DueBucket,
    /// Display label such as `"Overdue by 3 days"`.
    pub label: Option<String>,
}

/// Headline counts across the user's whole task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    /// Tasks not yet completed.
    pub active: usize,
    pub completed: usize,
    /// Tasks with URGENT priority, regardless of status.
    pub urgent: usize,
}

/// The digest payload: bucketed alerts plus headline counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    pub overdue: Vec<TaskAlert>,
    pub due_today: Vec<TaskAlert>,
    pub due_tomorrow: Vec<TaskAlert>,
    pub due_this_week: Vec<TaskAlert>,
    /// Overdue + due today + due tomorrow; the attention-banner count.
    pub urgent_count: usize,
    pub stats: TaskStats,
}

/// Build the digest for a task list. Only active tasks enter the buckets;
/// completed tasks still contribute to the stats.
pub fn build_summary(tasks: &[TaskView<'_>], today: NaiveDate) -> NotificationSummary {
    let mut overdue = Vec::new();
    let mut due_today = Vec::new();
    let mut due_tomorrow = Vec::new();
    let mut due_this_week = Vec::new();

    for task in tasks {
        if !is_active_status(task.status) {
            continue;
        }

        let status = classify(task.due_date, task.status, today);
        let bucket = if status.is_overdue {
            &mut overdue
        } else if status.is_due_today {
            &mut due_today
        } else if status.is_due_tomorrow {
            &mut due_tomorrow
        } else if status.is_due_this_week {
            &mut due_this_week
        } else {
            continue;
        };
        bucket.push(alert_for(task, &status));
    }

    let urgent_count = overdue.len() + due_today.len() + due_tomorrow.len();

    let stats = TaskStats {
        total: tasks.len(),
        active: tasks.iter().filter(|t| is_active_status(t.status)).count(),
        completed: tasks.iter().filter(|t| t.status == STATUS_DONE).count(),
        urgent: tasks.iter().filter(|t| t.priority == PRIORITY_URGENT).count(),
    };

    NotificationSummary {
        overdue,
        due_today,
        due_tomorrow,
        due_this_week,
        urgent_count,
        stats,
    }
}

fn alert_for(task: &TaskView<'_>, status: &DueDateStatus) -> TaskAlert {
    TaskAlert {
        id: task.id,
        title: task.title.to_string(),
        priority: task.priority.to_string(),
        due_date: task.due_date,
        bucket: status.bucket,
        label: task.due_date.map(|due| due_date_label(due, status)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::task::{
        PRIORITY_LOW, PRIORITY_MEDIUM, STATUS_IN_PROGRESS, STATUS_TODO,
    };
    use crate::types::Timestamp;

    use super::*;

    struct Fixture {
        id: DbId,
        title: String,
        status: String,
        priority: String,
        due_date: Option<NaiveDate>,
        created_at: Timestamp,
    }

    impl Fixture {
        fn view(&self) -> TaskView<'_> {
            TaskView {
                id: self.id,
                title: &self.title,
                description: None,
                status: &self.status,
                priority: &self.priority,
                due_date: self.due_date,
                created_at: self.created_at,
                category_ids: &[],
            }
        }
    }

    fn task(id: DbId, status: &str, priority: &str, due_date: Option<NaiveDate>) -> Fixture {
        Fixture {
            id,
            title: format!("task {id}"),
            status: status.to_string(),
            priority: priority.to_string(),
            due_date,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Wednesday; the week runs through Sunday 2024-01-14.
    fn today() -> NaiveDate {
        date(2024, 1, 10)
    }

    fn summarize(fixtures: &[Fixture]) -> NotificationSummary {
        let views: Vec<TaskView<'_>> = fixtures.iter().map(Fixture::view).collect();
        build_summary(&views, today())
    }

    fn ids(alerts: &[TaskAlert]) -> Vec<DbId> {
        alerts.iter().map(|a| a.id).collect()
    }

    #[test]
    fn buckets_are_disjoint_and_ordered_by_urgency() {
        let fixtures = vec![
            task(1, STATUS_TODO, PRIORITY_MEDIUM, Some(date(2024, 1, 8))),
            task(2, STATUS_TODO, PRIORITY_MEDIUM, Some(today())),
            task(3, STATUS_IN_PROGRESS, PRIORITY_MEDIUM, Some(date(2024, 1, 11))),
            task(4, STATUS_TODO, PRIORITY_MEDIUM, Some(date(2024, 1, 13))),
            task(5, STATUS_TODO, PRIORITY_MEDIUM, Some(date(2024, 2, 1))),
            task(6, STATUS_TODO, PRIORITY_MEDIUM, None),
        ];

        let summary = summarize(&fixtures);
        assert_eq!(ids(&summary.overdue), vec![1]);
        assert_eq!(ids(&summary.due_today), vec![2]);
        assert_eq!(ids(&summary.due_tomorrow), vec![3]);
        assert_eq!(ids(&summary.due_this_week), vec![4]);
        assert_eq!(summary.urgent_count, 3);
    }

    #[test]
    fn this_week_bucket_excludes_today_and_tomorrow() {
        let fixtures = vec![
            task(1, STATUS_TODO, PRIORITY_MEDIUM, Some(today())),
            task(2, STATUS_TODO, PRIORITY_MEDIUM, Some(date(2024, 1, 11))),
            task(3, STATUS_TODO, PRIORITY_MEDIUM, Some(date(2024, 1, 14))),
        ];

        let summary = summarize(&fixtures);
        assert_eq!(ids(&summary.due_this_week), vec![3]);
    }

    #[test]
    fn completed_tasks_never_alert_but_count_in_stats() {
        let fixtures = vec![
            task(1, STATUS_DONE, PRIORITY_URGENT, Some(date(2024, 1, 2))),
            task(2, STATUS_TODO, PRIORITY_LOW, Some(date(2024, 1, 2))),
        ];

        let summary = summarize(&fixtures);
        assert_eq!(ids(&summary.overdue), vec![2]);
        assert_eq!(summary.stats.total, 2);
        assert_eq!(summary.stats.active, 1);
        assert_eq!(summary.stats.completed, 1);
        // The urgent stat counts priority, not urgency buckets, so the
        // completed URGENT task still registers.
        assert_eq!(summary.stats.urgent, 1);
    }

    #[test]
    fn urgent_priority_due_today_counts_twice_over() {
        let fixtures = vec![task(1, STATUS_TODO, PRIORITY_URGENT, Some(today()))];

        let summary = summarize(&fixtures);
        assert_eq!(ids(&summary.due_today), vec![1]);
        assert_eq!(summary.urgent_count, 1);
        assert_eq!(summary.stats.urgent, 1);
    }

    #[test]
    fn alerts_carry_labels_and_buckets() {
        let fixtures = vec![task(1, STATUS_TODO, PRIORITY_MEDIUM, Some(date(2024, 1, 7)))];

        let summary = summarize(&fixtures);
        let alert = &summary.overdue[0];
        assert_eq!(alert.bucket, DueBucket::Overdue);
        assert_eq!(alert.label.as_deref(), Some("Overdue by 3 days"));
        assert_eq!(alert.due_date, Some(date(2024, 1, 7)));
    }

    #[test]
    fn undated_active_tasks_produce_no_alerts() {
        let fixtures = vec![task(1, STATUS_TODO, PRIORITY_MEDIUM, None)];

        let summary = summarize(&fixtures);
        assert!(summary.overdue.is_empty());
        assert!(summary.due_today.is_empty());
        assert!(summary.due_tomorrow.is_empty());
        assert!(summary.due_this_week.is_empty());
        assert_eq!(summary.urgent_count, 0);
        assert_eq!(summary.stats.active, 1);
    }
}
