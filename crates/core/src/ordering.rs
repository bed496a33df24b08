//! Task list filtering and ordering.
//!
//! The engine consumes borrowed [`TaskView`]s and returns the indices of
//! the matching tasks in display order, leaving the input untouched. The
//! sort is stable, so ties keep their stored order and repeated runs over
//! the same data produce identical output.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::task::{is_active_status, priority_rank, TaskView, VALID_STATUSES};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Status filter value matching every task.
pub const STATUS_FILTER_ALL: &str = "ALL";

/// Status filter value matching TODO and IN_PROGRESS tasks.
pub const STATUS_FILTER_ACTIVE: &str = "ACTIVE";

/// Filter criteria for task listing. `None` (or empty) fields impose no
/// constraint; populated fields must all match for a task to be included.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
    /// A concrete status, `ACTIVE`, or `ALL`.
    pub status: Option<String>,
    /// Only tasks assigned to this category.
    pub category_id: Option<DbId>,
}

/// Validate a status filter value: any concrete status plus the two
/// synthetic values `ACTIVE` and `ALL`.
pub fn validate_status_filter(value: &str) -> Result<(), CoreError> {
    if value.is_empty()
        || value == STATUS_FILTER_ALL
        || value == STATUS_FILTER_ACTIVE
        || VALID_STATUSES.contains(&value)
    {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status filter '{value}'. Must be one of: {}, {STATUS_FILTER_ACTIVE}, {STATUS_FILTER_ALL}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Check a single task against the filter.
pub fn matches_filter(task: &TaskView<'_>, filter: &TaskFilter) -> bool {
    if let Some(search) = filter.search.as_deref() {
        if !search.is_empty() {
            let needle = search.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
    }

    if let Some(status) = filter.status.as_deref() {
        let status_matches = match status {
            "" | STATUS_FILTER_ALL => true,
            STATUS_FILTER_ACTIVE => is_active_status(task.status),
            exact => task.status == exact,
        };
        if !status_matches {
            return false;
        }
    }

    if let Some(category_id) = filter.category_id {
        if !task.category_ids.contains(&category_id) {
            return false;
        }
    }

    true
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

pub const SORT_NEWEST: &str = "newest";
pub const SORT_OLDEST: &str = "oldest";
pub const SORT_DUE_DATE: &str = "dueDate";
pub const SORT_TITLE: &str = "title";

/// Sort key applied after the optional priority grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently created first (the default).
    #[default]
    Newest,
    /// Oldest created first.
    Oldest,
    /// Earliest due date first; tasks without a due date sort last.
    DueDate,
    /// Case-insensitive title order.
    Title,
}

impl SortKey {
    /// Parse the wire value (`newest`, `oldest`, `dueDate`, `title`).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            SORT_NEWEST => Ok(Self::Newest),
            SORT_OLDEST => Ok(Self::Oldest),
            SORT_DUE_DATE => Ok(Self::DueDate),
            SORT_TITLE => Ok(Self::Title),
            other => Err(CoreError::Validation(format!(
                "Invalid sort '{other}'. Must be one of: {SORT_NEWEST}, {SORT_OLDEST}, {SORT_DUE_DATE}, {SORT_TITLE}"
            ))),
        }
    }
}

/// Select the tasks matching `filter` and return their indices in display
/// order.
///
/// With `priority_first` set, tasks group by priority (URGENT first) and
/// the sort key orders tasks within each group.
pub fn select_tasks(
    tasks: &[TaskView<'_>],
    filter: &TaskFilter,
    sort: SortKey,
    priority_first: bool,
) -> Vec<usize> {
    let mut selected: Vec<usize> = (0..tasks.len())
        .filter(|&i| matches_filter(&tasks[i], filter))
        .collect();

    selected.sort_by(|&a, &b| compare_tasks(&tasks[a], &tasks[b], sort, priority_first));
    selected
}

fn compare_tasks(
    a: &TaskView<'_>,
    b: &TaskView<'_>,
    sort: SortKey,
    priority_first: bool,
) -> Ordering {
    if priority_first {
        let by_priority = priority_rank(b.priority).cmp(&priority_rank(a.priority));
        if by_priority != Ordering::Equal {
            return by_priority;
        }
    }

    match sort {
        SortKey::Newest => b.created_at.cmp(&a.created_at),
        SortKey::Oldest => a.created_at.cmp(&b.created_at),
        SortKey::DueDate => compare_due_dates(a.due_date, b.due_date),
        SortKey::Title => compare_titles(a.title, b.title),
    }
}

/// Earliest due date first; a missing due date always sorts after any
/// dated task.
fn compare_due_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive comparison with a byte-order tiebreak so titles that
/// fold to the same string still order deterministically.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use crate::task::{
        PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_URGENT, STATUS_DONE,
        STATUS_IN_PROGRESS, STATUS_TODO,
    };
    use crate::types::Timestamp;

    use super::*;

    struct Fixture {
        id: DbId,
        title: String,
        description: Option<String>,
        status: String,
        priority: String,
        due_date: Option<NaiveDate>,
        created_at: Timestamp,
        category_ids: Vec<DbId>,
    }

    impl Fixture {
        fn view(&self) -> TaskView<'_> {
            TaskView {
                id: self.id,
                title: &self.title,
                description: self.description.as_deref(),
                status: &self.status,
                priority: &self.priority,
                due_date: self.due_date,
                created_at: self.created_at,
                category_ids: &self.category_ids,
            }
        }
    }

    /// Fixture with defaults; `id` doubles as the creation order.
    fn task(id: DbId, title: &str) -> Fixture {
        Fixture {
            id,
            title: title.to_string(),
            description: None,
            status: STATUS_TODO.to_string(),
            priority: PRIORITY_MEDIUM.to_string(),
            due_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
                + Duration::seconds(id),
            category_ids: Vec::new(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn select<'a>(
        fixtures: &'a [Fixture],
        filter: &TaskFilter,
        sort: SortKey,
        priority_first: bool,
    ) -> Vec<DbId> {
        let views: Vec<TaskView<'a>> = fixtures.iter().map(Fixture::view).collect();
        select_tasks(&views, filter, sort, priority_first)
            .into_iter()
            .map(|i| views[i].id)
            .collect()
    }

    #[test]
    fn search_matches_title_and_description_case_insensitively() {
        let mut groceries = task(1, "Buy groceries");
        groceries.description = Some("milk and EGGS".to_string());
        let fixtures = vec![groceries, task(2, "Write report"), task(3, "egg hunt")];

        let filter = TaskFilter {
            search: Some("EGG".to_string()),
            ..TaskFilter::default()
        };
        let ids = select(&fixtures, &filter, SortKey::Oldest, false);
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn empty_search_matches_everything() {
        let fixtures = vec![task(1, "a"), task(2, "b")];
        let filter = TaskFilter {
            search: Some(String::new()),
            ..TaskFilter::default()
        };
        assert_eq!(select(&fixtures, &filter, SortKey::Oldest, false), vec![1, 2]);
    }

    #[test]
    fn active_status_filter_excludes_done() {
        let mut doing = task(1, "doing");
        doing.status = STATUS_IN_PROGRESS.to_string();
        let mut done = task(2, "done");
        done.status = STATUS_DONE.to_string();
        let fixtures = vec![doing, done, task(3, "todo")];

        let filter = TaskFilter {
            status: Some(STATUS_FILTER_ACTIVE.to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(select(&fixtures, &filter, SortKey::Oldest, false), vec![1, 3]);

        let all = TaskFilter {
            status: Some(STATUS_FILTER_ALL.to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(select(&fixtures, &all, SortKey::Oldest, false), vec![1, 2, 3]);

        let exact = TaskFilter {
            status: Some(STATUS_DONE.to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(select(&fixtures, &exact, SortKey::Oldest, false), vec![2]);
    }

    #[test]
    fn category_filter_requires_membership() {
        let mut tagged = task(1, "tagged");
        tagged.category_ids = vec![10, 20];
        let fixtures = vec![tagged, task(2, "untagged")];

        let filter = TaskFilter {
            category_id: Some(20),
            ..TaskFilter::default()
        };
        assert_eq!(select(&fixtures, &filter, SortKey::Oldest, false), vec![1]);

        let missing = TaskFilter {
            category_id: Some(99),
            ..TaskFilter::default()
        };
        assert!(select(&fixtures, &missing, SortKey::Oldest, false).is_empty());
    }

    #[test]
    fn newest_is_the_default_and_sorts_descending() {
        let fixtures = vec![task(1, "first"), task(3, "third"), task(2, "second")];
        assert_eq!(SortKey::default(), SortKey::Newest);
        assert_eq!(
            select(&fixtures, &TaskFilter::default(), SortKey::Newest, false),
            vec![3, 2, 1]
        );
        assert_eq!(
            select(&fixtures, &TaskFilter::default(), SortKey::Oldest, false),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn due_date_sort_puts_undated_tasks_last() {
        let mut late = task(1, "late");
        late.due_date = Some(date(2024, 3, 1));
        let mut soon = task(2, "soon");
        soon.due_date = Some(date(2024, 1, 15));
        let undated = task(3, "undated");
        let fixtures = vec![late, soon, undated];

        assert_eq!(
            select(&fixtures, &TaskFilter::default(), SortKey::DueDate, false),
            vec![2, 1, 3]
        );
    }

    #[test]
    fn title_sort_is_case_insensitive_with_byte_tiebreak() {
        let fixtures = vec![
            task(1, "cherry"),
            task(2, "Apple"),
            task(3, "banana"),
            task(4, "apple"),
        ];
        // "Apple" and "apple" fold together; the capital sorts first by
        // byte order.
        assert_eq!(
            select(&fixtures, &TaskFilter::default(), SortKey::Title, false),
            vec![2, 4, 3, 1]
        );
    }

    #[test]
    fn priority_first_groups_before_the_sort_key() {
        let mut low = task(1, "low");
        low.priority = PRIORITY_LOW.to_string();
        let mut urgent_late = task(2, "urgent late");
        urgent_late.priority = PRIORITY_URGENT.to_string();
        urgent_late.due_date = Some(date(2024, 2, 1));
        let mut urgent_soon = task(3, "urgent soon");
        urgent_soon.priority = PRIORITY_URGENT.to_string();
        urgent_soon.due_date = Some(date(2024, 1, 5));
        let mut high = task(4, "high");
        high.priority = PRIORITY_HIGH.to_string();
        let fixtures = vec![low, urgent_late, urgent_soon, high];

        // Urgent tasks first, ordered among themselves by due date.
        assert_eq!(
            select(&fixtures, &TaskFilter::default(), SortKey::DueDate, true),
            vec![3, 2, 4, 1]
        );
    }

    #[test]
    fn equal_keys_keep_stored_order() {
        let mut a = task(1, "a");
        let mut b = task(2, "b");
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        a.created_at = created;
        b.created_at = created;
        let fixtures = vec![a, b];

        assert_eq!(
            select(&fixtures, &TaskFilter::default(), SortKey::Newest, false),
            vec![1, 2]
        );
    }

    #[test]
    fn status_filter_validation() {
        assert!(validate_status_filter("TODO").is_ok());
        assert!(validate_status_filter(STATUS_FILTER_ACTIVE).is_ok());
        assert!(validate_status_filter(STATUS_FILTER_ALL).is_ok());
        assert!(validate_status_filter("").is_ok());
        assert_matches!(
            validate_status_filter("WAITING"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!(SortKey::parse("newest").unwrap(), SortKey::Newest);
        assert_eq!(SortKey::parse("dueDate").unwrap(), SortKey::DueDate);
        assert_matches!(SortKey::parse("duedate"), Err(CoreError::Validation(_)));
    }
}
