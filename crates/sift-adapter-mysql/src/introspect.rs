use sqlx::MySqlPool;

/// `(table, column, data_type)` for every column of `schema`, clustered by
/// table and ordered by ordinal position.
///
/// Names are cast to CHAR because MySQL 8 reports several
/// `information_schema` columns with binary collations.
pub async fn catalog_rows(
    pool: &MySqlPool,
    schema: &str,
) -> anyhow::Result<Vec<(String, String, String)>> {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        r#"
        SELECT
          CAST(TABLE_NAME AS CHAR) AS table_name,
          CAST(COLUMN_NAME AS CHAR) AS column_name,
          CAST(DATA_TYPE AS CHAR) AS data_type
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ?
        ORDER BY TABLE_NAME, ORDINAL_POSITION
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await?;

    tracing::debug!(schema = %schema, columns = rows.len(), "Introspected columns");
    Ok(rows)
}
