//! Task export: row derivation plus CSV and JSON payload shapes.
//!
//! Which tasks to export is resolved in SQL by the repository layer; this
//! module turns the selected tasks into display-ready rows and renders
//! them. CSV output always wraps the free-text columns (title,
//! description, categories) in double quotes with embedded quotes
//! doubled, so commas and line breaks inside values never split a row.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Wire values
// ---------------------------------------------------------------------------

/// Body returned for a CSV export that matched no tasks.
pub const EMPTY_EXPORT_BODY: &str = "No tasks to export";

/// Placeholder rendered for absent due dates.
pub const NO_DUE_DATE: &str = "No due date";

/// Placeholder rendered for tasks without categories.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Filter value meaning "no constraint".
pub const FILTER_ALL: &str = "ALL";

/// CSV header row. Column order matches [`ExportedTask`]'s CSV rendering.
pub const CSV_HEADERS: &str =
    "ID,Title,Description,Status,Priority,Due Date,Categories,Days Until Due,Created At,Updated At";

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(CoreError::Validation(format!(
                "Invalid format '{other}'. Must be one of: csv, json"
            ))),
        }
    }
}

/// How the exported task set is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMethod {
    /// An explicit id list. An empty list degrades to no restriction.
    Selected,
    /// The status/priority/category/date-range filters.
    #[default]
    Filtered,
    /// Every task the user owns.
    All,
}

impl ExportMethod {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "selected" => Ok(Self::Selected),
            "filtered" => Ok(Self::Filtered),
            "all" => Ok(Self::All),
            other => Err(CoreError::Validation(format!(
                "Invalid exportMethod '{other}'. Must be one of: selected, filtered, all"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportMethod::Selected => "selected",
            ExportMethod::Filtered => "filtered",
            ExportMethod::All => "all",
        }
    }
}

// ---------------------------------------------------------------------------
// Export metadata (JSON format only)
// ---------------------------------------------------------------------------

/// Due-date range bounds, echoed back as received.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// The filter parameters of a `filtered` export, echoed back verbatim in
/// the export metadata. Unused filters serialize as explicit nulls.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilters {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<String>,
    pub date_range: DateRange,
}

/// Metadata attached to JSON exports. `filters` is only present for the
/// `filtered` method and `selected_task_ids` only for `selected`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub exported_at: Timestamp,
    pub total_tasks: usize,
    pub export_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<ExportFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_task_ids: Option<Vec<DbId>>,
}

/// Full JSON export payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub tasks: Vec<ExportedTask>,
    pub export_info: ExportInfo,
}

// ---------------------------------------------------------------------------
// Row derivation
// ---------------------------------------------------------------------------

/// Input to row derivation: one task with its category names resolved.
#[derive(Debug, Clone)]
pub struct ExportSource<'a> {
    pub id: DbId,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub priority: &'a str,
    pub due_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub category_names: Vec<&'a str>,
}

/// A display-ready export row. Serializes in camelCase for the JSON
/// format; the CSV renderer consumes the same derived fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedTask {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    /// ISO date, or `"No due date"`.
    pub due_date: String,
    /// Creation date (date part only).
    pub created_at: String,
    /// Last update date (date part only).
    pub updated_at: String,
    /// Comma-joined category names, or `"Uncategorized"`.
    pub categories: String,
    /// Signed whole days until due; `null` without a due date.
    pub days_until_due: Option<i64>,
}

/// Derive display-ready rows. `today` anchors the day distances.
pub fn build_rows(sources: &[ExportSource<'_>], today: NaiveDate) -> Vec<ExportedTask> {
    sources.iter().map(|source| build_row(source, today)).collect()
}

fn build_row(source: &ExportSource<'_>, today: NaiveDate) -> ExportedTask {
    ExportedTask {
        id: source.id,
        title: source.title.to_string(),
        description: source.description.map(str::to_string),
        status: source.status.to_string(),
        priority: source.priority.to_string(),
        due_date: source
            .due_date
            .map_or_else(|| NO_DUE_DATE.to_string(), |d| d.format("%Y-%m-%d").to_string()),
        created_at: source.created_at.format("%Y-%m-%d").to_string(),
        updated_at: source.updated_at.format("%Y-%m-%d").to_string(),
        categories: if source.category_names.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            source.category_names.join(", ")
        },
        days_until_due: source.due_date.map(|due| (due - today).num_days()),
    }
}

// ---------------------------------------------------------------------------
// CSV rendering
// ---------------------------------------------------------------------------

/// Render rows as CSV. An empty row set renders the fixed
/// `"No tasks to export"` body instead of a lone header line.
pub fn render_csv(rows: &[ExportedTask]) -> String {
    if rows.is_empty() {
        return EMPTY_EXPORT_BODY.to_string();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADERS.to_string());

    for row in rows {
        let days_until_due = row
            .days_until_due
            .map_or_else(|| NO_DUE_DATE.to_string(), |d| d.to_string());
        lines.push(
            [
                row.id.to_string(),
                csv_quote(&row.title),
                csv_quote(row.description.as_deref().unwrap_or_default()),
                row.status.clone(),
                row.priority.clone(),
                row.due_date.clone(),
                csv_quote(&row.categories),
                days_until_due,
                row.created_at.clone(),
                row.updated_at.clone(),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// Wrap a value in double quotes, doubling any embedded quotes.
fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Download filename for a CSV export: `tasks-<method>-<date>.csv`, or
/// `tasks-empty.csv` when nothing matched.
pub fn csv_file_name(method: ExportMethod, today: NaiveDate, empty: bool) -> String {
    if empty {
        "tasks-empty.csv".to_string()
    } else {
        format!("tasks-{}-{}.csv", method.as_str(), today.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn source(id: DbId) -> ExportSource<'static> {
        ExportSource {
            id,
            title: "Write report",
            description: Some("quarterly numbers"),
            status: "TODO",
            priority: "HIGH",
            due_date: Some(date(2024, 1, 20)),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 5, 16, 0, 0).unwrap(),
            category_names: vec!["Work", "Reports"],
        }
    }

    #[test]
    fn rows_derive_display_fields() {
        let rows = build_rows(&[source(1)], date(2024, 1, 10));
        let row = &rows[0];
        assert_eq!(row.due_date, "2024-01-20");
        assert_eq!(row.created_at, "2024-01-02");
        assert_eq!(row.updated_at, "2024-01-05");
        assert_eq!(row.categories, "Work, Reports");
        assert_eq!(row.days_until_due, Some(10));
    }

    #[test]
    fn rows_use_placeholders_without_due_date_or_categories() {
        let mut bare = source(2);
        bare.due_date = None;
        bare.category_names = Vec::new();

        let rows = build_rows(&[bare], date(2024, 1, 10));
        assert_eq!(rows[0].due_date, NO_DUE_DATE);
        assert_eq!(rows[0].categories, UNCATEGORIZED);
        assert_eq!(rows[0].days_until_due, None);
    }

    #[test]
    fn overdue_rows_report_negative_days() {
        let mut late = source(3);
        late.due_date = Some(date(2024, 1, 5));
        let rows = build_rows(&[late], date(2024, 1, 10));
        assert_eq!(rows[0].days_until_due, Some(-5));
    }

    #[test]
    fn csv_starts_with_the_header_row() {
        let rows = build_rows(&[source(1)], date(2024, 1, 10));
        let csv = render_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADERS));
        assert_eq!(
            lines.next(),
            Some(
                "1,\"Write report\",\"quarterly numbers\",TODO,HIGH,2024-01-20,\"Work, Reports\",10,2024-01-02,2024-01-05"
            )
        );
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let mut tricky = source(4);
        tricky.title = "Say \"hello\", then leave";
        let rows = build_rows(&[tricky], date(2024, 1, 10));
        let csv = render_csv(&rows);
        assert!(csv.contains("\"Say \"\"hello\"\", then leave\""));
    }

    #[test]
    fn csv_renders_missing_description_as_quoted_empty() {
        let mut bare = source(5);
        bare.description = None;
        bare.due_date = None;
        let rows = build_rows(&[bare], date(2024, 1, 10));
        let csv = render_csv(&rows);
        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.contains(",\"\","));
        assert!(data_line.contains("No due date"));
    }

    #[test]
    fn empty_export_renders_fixed_body() {
        assert_eq!(render_csv(&[]), EMPTY_EXPORT_BODY);
    }

    #[test]
    fn file_names_follow_method_and_date() {
        let today = date(2024, 1, 10);
        assert_eq!(
            csv_file_name(ExportMethod::Filtered, today, false),
            "tasks-filtered-2024-01-10.csv"
        );
        assert_eq!(
            csv_file_name(ExportMethod::All, today, false),
            "tasks-all-2024-01-10.csv"
        );
        assert_eq!(
            csv_file_name(ExportMethod::Selected, today, true),
            "tasks-empty.csv"
        );
    }

    #[test]
    fn json_payload_uses_camel_case_and_echoes_filters() {
        let rows = build_rows(&[source(1)], date(2024, 1, 10));
        let payload = ExportPayload {
            tasks: rows,
            export_info: ExportInfo {
                exported_at: Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
                total_tasks: 1,
                export_method: ExportMethod::Filtered.as_str(),
                filters: Some(ExportFilters {
                    status: Some("TODO".to_string()),
                    priority: None,
                    category_id: None,
                    date_range: DateRange::default(),
                }),
                selected_task_ids: None,
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["exportInfo"]["totalTasks"], json!(1));
        assert_eq!(value["exportInfo"]["exportMethod"], json!("filtered"));
        // Unused filters are explicit nulls, not omitted.
        assert_eq!(value["exportInfo"]["filters"]["priority"], json!(null));
        assert_eq!(
            value["exportInfo"]["filters"]["dateRange"]["startDate"],
            json!(null)
        );
        // selectedTaskIds is absent entirely for non-selected methods.
        assert!(value["exportInfo"].get("selectedTaskIds").is_none());
        assert_eq!(value["tasks"][0]["daysUntilDue"], json!(10));
        assert_eq!(value["tasks"][0]["dueDate"], json!("2024-01-20"));
    }

    #[test]
    fn parse_rejects_unknown_wire_values() {
        assert_eq!(ExportFormat::parse("csv").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::default(), ExportFormat::Json);
        assert_matches!(ExportFormat::parse("xml"), Err(CoreError::Validation(_)));

        assert_eq!(ExportMethod::parse("all").unwrap(), ExportMethod::All);
        assert_eq!(ExportMethod::default(), ExportMethod::Filtered);
        assert_matches!(ExportMethod::parse("some"), Err(CoreError::Validation(_)));
    }
}
