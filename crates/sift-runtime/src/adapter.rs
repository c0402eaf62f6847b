use async_trait::async_trait;
use sift_core::Value;

/// Rows returned by one search statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    /// Result column names in select order.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Read-only access to one database, as seen by the search pipeline.
///
/// Implementations must be safe to call concurrently from several tasks when
/// a run is configured with more than one job; the pipeline never writes.
#[async_trait]
pub trait SchemaHandle: Send + Sync {
    /// `(table, column, data_type)` for every column of `schema`, ordered by
    /// table name then ordinal position.
    async fn catalog_rows(&self, schema: &str) -> anyhow::Result<Vec<(String, String, String)>>;

    /// Execute a parameterized statement and return at most `max_rows` rows.
    /// Each `?` placeholder in `sql` is bound to the matching entry of `params`.
    async fn fetch_rows(
        &self,
        sql: &str,
        params: &[String],
        max_rows: usize,
    ) -> anyhow::Result<RowSet>;
}
