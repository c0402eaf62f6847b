//! Schema catalog reader.

use crate::adapter::SchemaHandle;
use sift_core::{CatalogError, TableInfo, group_catalog_rows};

/// Enumerate the tables of `schema` with their columns in ordinal order.
///
/// Any introspection failure is fatal to the run.
pub async fn list_tables<H>(handle: &H, schema: &str) -> Result<Vec<TableInfo>, CatalogError>
where
    H: SchemaHandle + ?Sized,
{
    let rows = handle
        .catalog_rows(schema)
        .await
        .map_err(|e| CatalogError {
            schema: schema.to_string(),
            message: format!("{:#}", e),
        })?;

    let tables = group_catalog_rows(rows);
    tracing::debug!(schema = %schema, tables = tables.len(), "Catalog read");
    Ok(tables)
}
