//! Search executor.
//!
//! Per table: `Pending -> (dry run ? DisplayOnly : Executing) -> Success | Failed`.
//! A failure is returned as a [`QueryError`] for the caller to report; it
//! never ends the run.

use std::time::Duration;

use crate::adapter::SchemaHandle;
use sift_core::{QueryError, SearchOptions, SearchResult};
use sift_planner::SearchStatement;
use tracing::info;

/// Run one table's statement, or only describe it in dry-run mode.
///
/// Only `statement.sql` and `statement.params` reach the handle; the display
/// rendering is copied into the result untouched.
pub async fn execute<H>(
    handle: &H,
    table: &str,
    statement: &SearchStatement,
    options: &SearchOptions,
) -> Result<SearchResult, QueryError>
where
    H: SchemaHandle + ?Sized,
{
    if options.dry_run {
        return Ok(SearchResult::display_only(table, statement.display.clone()));
    }

    info!(table = %table, "Searching table");

    let limit = options.row_limit_per_table;
    let timeout = Duration::from_secs(options.query_timeout_secs);
    let fetched = tokio::time::timeout(
        timeout,
        handle.fetch_rows(&statement.sql, &statement.params, limit),
    )
    .await
    .map_err(|_| {
        QueryError::new(
            table,
            format!("query timed out after {}s", options.query_timeout_secs),
        )
    })?
    .map_err(|e| QueryError::new(table, format!("{:#}", e)))?;

    let mut rows = fetched.rows;
    rows.truncate(limit);

    Ok(SearchResult {
        table_name: table.to_string(),
        display_query: statement.display.clone(),
        columns: fetched.columns,
        rows,
    })
}
