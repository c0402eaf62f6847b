//! Error taxonomy for a search run.
//!
//! Everything except [`QueryError`] is fatal to the run. A `QueryError` is
//! scoped to one table and is reported without stopping the remaining tables.

use thiserror::Error;

/// A glob pattern that failed to compile.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed pattern '{pattern}': {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason: String,
}

/// Invalid configuration: bad values, malformed patterns, unreadable config files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: usize },

    #[error("search term must not be empty")]
    EmptyTerm,
}

/// The database could not be reached or identified.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("no database connection configured (use --database-url, DATABASE_URL, a config file or --ddev)")]
    NotConfigured,

    #[error("failed to discover DDEV database: {0}")]
    Discovery(String),

    #[error("failed to connect to database: {0}")]
    Connect(String),

    #[error("no schema selected; pass --schema or include a database in the URL")]
    NoSchema,
}

/// Schema introspection failed; nothing can be searched.
#[derive(Debug, Error)]
#[error("failed to read catalog for schema '{schema}': {message}")]
pub struct CatalogError {
    pub schema: String,
    pub message: String,
}

/// One table's search statement failed.
#[derive(Debug, Error)]
#[error("error searching table {table}: {message}")]
pub struct QueryError {
    pub table: String,
    pub message: String,
}

impl QueryError {
    pub fn new(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            message: message.into(),
        }
    }
}

/// Fatal errors that end a run.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<PatternError> for SearchError {
    fn from(err: PatternError) -> Self {
        SearchError::Config(ConfigError::Pattern(err))
    }
}
