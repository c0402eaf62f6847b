use futures::StreamExt;
use futures::stream;
use sift_core::{QueryError, SearchError, SearchOptions, SearchResult, TableInfo};
use sift_planner::{PlanError, SearchStatement, TableFilter, build_search};
use tracing::{debug, info, warn};

use crate::adapter::SchemaHandle;
use crate::{catalog, executor};

/// Everything a run produced, in catalog order.
#[derive(Debug, Default)]
pub struct SearchRun {
    /// Tables reported by the catalog.
    pub tables_found: usize,
    /// Tables that passed filtering and received a statement.
    pub tables_planned: usize,
    /// One result per table that was searched (or previewed) successfully.
    pub results: Vec<SearchResult>,
    /// Tables whose statement failed.
    pub failures: Vec<QueryError>,
}

/// Drives catalog read, filtering, synthesis and execution for one schema.
pub struct Searcher<'a, H: SchemaHandle + ?Sized> {
    handle: &'a H,
    options: &'a SearchOptions,
    filter: TableFilter,
}

impl<'a, H: SchemaHandle + ?Sized> Searcher<'a, H> {
    /// Validate options and compile the table patterns.
    ///
    /// Fails before any database access if a value or a pattern is invalid.
    pub fn new(handle: &'a H, options: &'a SearchOptions) -> Result<Self, SearchError> {
        options.validate()?;
        let filter = TableFilter::from_options(options)?;
        Ok(Self {
            handle,
            options,
            filter,
        })
    }

    /// Search every eligible table of `schema`.
    ///
    /// Catalog failures abort the run; per-table query failures are logged
    /// and collected in [`SearchRun::failures`].
    pub async fn run(&self, schema: &str) -> Result<SearchRun, SearchError> {
        let tables = catalog::list_tables(self.handle, schema).await?;
        info!("Found {} tables", tables.len());

        let planned = self.plan(schema, &tables);

        let jobs = self.options.concurrency.max(1);
        let outcomes: Vec<Result<SearchResult, QueryError>> = stream::iter(planned.iter())
            .map(|(table, statement)| executor::execute(self.handle, table, statement, self.options))
            .buffered(jobs)
            .collect()
            .await;

        let mut run = SearchRun {
            tables_found: tables.len(),
            tables_planned: planned.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(result) => run.results.push(result),
                Err(err) => {
                    warn!(table = %err.table, "{}", err);
                    run.failures.push(err);
                }
            }
        }

        Ok(run)
    }

    /// Filter tables and build their statements, preserving catalog order.
    fn plan(&self, schema: &str, tables: &[TableInfo]) -> Vec<(String, SearchStatement)> {
        tables
            .iter()
            .filter_map(|table| {
                if !self.filter.allows(&table.name) {
                    debug!(table = %table.name, "Skipping filtered table");
                    return None;
                }

                let columns = table.searchable_columns(self.options.column_match);
                match build_search(
                    schema,
                    &table.name,
                    columns.as_slice(),
                    &self.options.term,
                    self.options.row_limit_per_table,
                ) {
                    Ok(statement) => Some((table.name.clone(), statement)),
                    Err(PlanError::NoSearchableColumns { .. }) => {
                        debug!(table = %table.name, "Skipping table without searchable columns");
                        None
                    }
                }
            })
            .collect()
    }
}
