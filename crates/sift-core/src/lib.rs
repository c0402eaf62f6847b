//! # sift-core
//!
//! Types shared by every sift crate: the catalog model produced by schema
//! introspection, the closed cell [`Value`] representation, per-table
//! [`SearchResult`]s, the error taxonomy and the run configuration.

use serde::{Deserialize, Serialize};

// Configuration types shared across all sift crates
pub mod config;
pub mod error;

pub use config::{ColumnMatch, ConnectionConfig, SearchOptions, SiftConfig};
pub use error::{
    CatalogError, ConfigError, ConnectionError, PatternError, QueryError, SearchError,
};

/// A single column as reported by catalog introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Lowercase SQL data type (e.g. `varchar`, `int`, `json`).
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into().to_ascii_lowercase(),
        }
    }

    /// Whether the column stores character data that a text-only search should cover.
    pub fn is_textual(&self) -> bool {
        matches!(
            self.data_type.as_str(),
            "char"
                | "varchar"
                | "tinytext"
                | "text"
                | "mediumtext"
                | "longtext"
                | "enum"
                | "set"
                | "json"
        )
    }
}

/// A table and its columns in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Builder-style helper, mostly useful in tests and fixtures.
    pub fn with_column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.push(ColumnInfo::new(name, data_type));
        self
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns that should receive a search predicate under the given match mode.
    pub fn searchable_columns(&self, mode: ColumnMatch) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| match mode {
                ColumnMatch::All => true,
                ColumnMatch::Text => c.is_textual(),
            })
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Group `(table, column, data_type)` catalog rows into tables.
///
/// Rows must already be clustered by table and ordered by ordinal position;
/// grouping is a single pass that starts a new table whenever the name changes.
pub fn group_catalog_rows<I>(rows: I) -> Vec<TableInfo>
where
    I: IntoIterator<Item = (String, String, String)>,
{
    let mut tables: Vec<TableInfo> = Vec::new();

    for (table_name, column_name, data_type) in rows {
        match tables.last_mut() {
            Some(current) if current.name == table_name => {
                current.columns.push(ColumnInfo::new(column_name, data_type));
            }
            _ => {
                tables.push(TableInfo::new(table_name).with_column(column_name, data_type));
            }
        }
    }

    tables
}

/// A single cell as materialized from a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Text(String),
    Binary(Vec<u8>),
}

impl Value {
    /// Text used in the report. Binary payloads are decoded lossily as UTF-8.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Text(s) => s.clone(),
            Value::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Outcome of searching one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub table_name: String,
    /// Human-readable statement with literals inlined. Never executed.
    pub display_query: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SearchResult {
    /// A result that carries only the statement preview (dry runs).
    pub fn display_only(table_name: impl Into<String>, display_query: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            display_query: display_query.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.rows.is_empty()
    }
}
