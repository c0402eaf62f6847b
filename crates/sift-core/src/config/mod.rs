//! Configuration types for sift.
//!
//! A run is configured from three layers, highest precedence first:
//! command-line flags, an optional YAML file (`sift.yaml`), built-in defaults.
//! This module owns the file layer and the defaults; flag merging happens in
//! the CLI.
//!
//! ```yaml
//! connection:
//!   database_url_env: DATABASE_URL
//! search:
//!   limit: 20
//!   exclude: ["*_backup", "cache_*"]
//! ```

pub mod connection;
pub mod search;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use connection::{ConnectionConfig, database_from_url};
pub use search::{ColumnMatch, SearchOptions};

use crate::error::ConfigError;

/// Complete sift configuration loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiftConfig {
    /// Database connection.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Defaults for search options.
    #[serde(default)]
    pub search: SearchOptions,
}

impl SiftConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}
