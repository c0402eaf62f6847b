//! MySQL implementation of [`SchemaHandle`].
//!
//! The handle wraps a `sqlx` connection pool. Pool handles are cheap to share
//! and safe to use from concurrent tasks, which is what allows a run with
//! several jobs to search tables in parallel through one `MySqlSchema`.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use sift_core::ConnectionError;
use sift_runtime::{RowSet, SchemaHandle};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::{Column, Row};

pub mod introspect;
pub mod value;

#[derive(Debug, Clone, Copy)]
pub struct MySqlAdapterOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for MySqlAdapterOptions {
    fn default() -> Self {
        Self {
            max_connections: 4,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

pub struct MySqlSchema {
    pool: MySqlPool,
}

impl MySqlSchema {
    /// Open a pool. Establishing the first connection doubles as the ping.
    pub async fn connect(
        database_url: &str,
        options: MySqlAdapterOptions,
    ) -> Result<Self, ConnectionError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(options.max_connections.max(1))
            .acquire_timeout(options.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| ConnectionError::Connect(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// The connection's default schema (`SELECT DATABASE()`).
    pub async fn current_schema(&self) -> Result<String, ConnectionError> {
        let name: Option<String> = sqlx::query_scalar("SELECT CAST(DATABASE() AS CHAR)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ConnectionError::Connect(e.to_string()))?;
        name.ok_or(ConnectionError::NoSchema)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SchemaHandle for MySqlSchema {
    async fn catalog_rows(&self, schema: &str) -> anyhow::Result<Vec<(String, String, String)>> {
        introspect::catalog_rows(&self.pool, schema).await
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        params: &[String],
        max_rows: usize,
    ) -> anyhow::Result<RowSet> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.as_str());
        }

        let mut stream = query.fetch(&self.pool);
        let mut result = RowSet::default();

        while result.rows.len() < max_rows {
            let Some(row) = stream.try_next().await? else {
                break;
            };
            if result.columns.is_empty() {
                result.columns = row.columns().iter().map(|c| c.name().to_string()).collect();
            }
            result.rows.push(value::decode_row(&row)?);
        }

        Ok(result)
    }
}
