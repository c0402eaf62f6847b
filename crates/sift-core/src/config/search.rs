//! Search option types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which columns receive a `LIKE` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnMatch {
    /// Every column of the table (default).
    #[default]
    All,
    /// Only character/JSON columns.
    Text,
}

/// Immutable options for one search run.
///
/// The search term is never read from a config file; it is always supplied
/// by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Substring to look for.
    #[serde(skip)]
    pub term: String,

    /// Maximum rows fetched per table.
    #[serde(rename = "limit", default = "default_row_limit")]
    pub row_limit_per_table: usize,

    /// Only tables matching at least one of these globs are searched.
    #[serde(default)]
    pub include: Vec<String>,

    /// Tables matching any of these globs are skipped. Wins over `include`.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Maximum number of values shown per row line.
    #[serde(rename = "column_limit", default = "default_column_limit")]
    pub column_display_limit: usize,

    /// Whether long values are shortened in the report.
    #[serde(default = "default_true")]
    pub truncate: bool,

    /// Character budget for a value before the ellipsis.
    #[serde(default = "default_truncate_length")]
    pub truncate_length: usize,

    /// Report the statements that would run without reading any rows.
    #[serde(skip)]
    pub dry_run: bool,

    /// Column selection for predicates.
    #[serde(rename = "match", default)]
    pub column_match: ColumnMatch,

    /// Upper bound on a single table query, in seconds.
    #[serde(rename = "query_timeout_seconds", default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    /// Number of tables searched at the same time.
    #[serde(rename = "jobs", default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            term: String::new(),
            row_limit_per_table: default_row_limit(),
            include: Vec::new(),
            exclude: Vec::new(),
            column_display_limit: default_column_limit(),
            truncate: true,
            truncate_length: default_truncate_length(),
            dry_run: false,
            column_match: ColumnMatch::default(),
            query_timeout_secs: default_query_timeout(),
            concurrency: default_concurrency(),
        }
    }
}

impl SearchOptions {
    /// Default options for the given term.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Bound value for every `LIKE` placeholder.
    pub fn like_pattern(&self) -> String {
        format!("%{}%", self.term)
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.term.is_empty() {
            return Err(ConfigError::EmptyTerm);
        }

        let positive = [
            ("limit", self.row_limit_per_table),
            ("column-limit", self.column_display_limit),
            ("truncate-length", self.truncate_length),
            ("timeout", self.query_timeout_secs as usize),
            ("jobs", self.concurrency),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        Ok(())
    }
}

fn default_row_limit() -> usize {
    20
}

fn default_column_limit() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_truncate_length() -> usize {
    50
}

fn default_query_timeout() -> u64 {
    30
}

fn default_concurrency() -> usize {
    1
}
