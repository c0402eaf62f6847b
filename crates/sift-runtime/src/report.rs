//! Result formatter.
//!
//! Layout of one reported table:
//!
//! ```text
//! Table: users - Query:
//! SELECT t.* FROM db.users t WHERE `id` LIKE '%bob%' OR `email` LIKE '%bob%' LIMIT 20;
//! "7","bob@x.com"
//!
//! ```

use std::fmt;

use sift_core::{SearchOptions, SearchResult, Value};

/// Appended to values cut by truncation.
pub const ELLIPSIS: &str = "...";

/// Run-level counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Matching rows across all tables.
    pub total_rows: usize,
    /// Tables with at least one matching row.
    pub matched_tables: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} matches in {} tables",
            self.total_rows, self.matched_tables
        )
    }
}

/// Rendered report text plus its summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    pub summary: Summary,
}

/// Render results in order. Tables without rows are omitted unless this is a
/// dry run, where every previewed statement is shown.
pub fn render(results: &[SearchResult], options: &SearchOptions) -> Report {
    let mut report = Report::default();

    for result in results {
        if !options.dry_run && !result.has_matches() {
            continue;
        }

        report.text.push_str(&format!(
            "Table: {} - Query:\n{}\n",
            result.table_name, result.display_query
        ));
        for row in &result.rows {
            report.text.push_str(&format_row(row, options));
            report.text.push('\n');
        }
        report.text.push('\n');

        report.summary.total_rows += result.rows.len();
        if result.has_matches() {
            report.summary.matched_tables += 1;
        }
    }

    report
}

/// One report line: the first `column_display_limit` values, each quoted and
/// optionally truncated, comma-joined.
pub fn format_row(row: &[Value], options: &SearchOptions) -> String {
    row.iter()
        .take(options.column_display_limit)
        .map(|value| {
            let text = value.render();
            let text = if options.truncate {
                truncate(&text, options.truncate_length)
            } else {
                text
            };
            format!("\"{}\"", text.replace('"', "\"\""))
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Keep the first `max_chars` characters and append [`ELLIPSIS`] when the
/// value is longer. Counts characters, not bytes.
pub fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &value[..cut], ELLIPSIS),
        None => value.to_string(),
    }
}
