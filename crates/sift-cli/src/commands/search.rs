//! The search command.
//!
//! Resolves configuration and the connection, then hands a validated
//! `SearchOptions` and an open schema handle to the runtime. The report goes
//! to stdout; progress, per-table failures and the summary go to stderr.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use sift_adapter_mysql::{MySqlAdapterOptions, MySqlSchema};
use sift_core::config::database_from_url;
use sift_core::{ConnectionConfig, ConnectionError, SearchError, SearchOptions, SiftConfig};
use sift_planner::TableFilter;
use sift_runtime::{Searcher, report};
use tracing::{info, warn};

use crate::Cli;
use crate::ddev;

/// Where to connect and, when known up front, which schema to search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub schema: Option<String>,
}

pub async fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SiftConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => SiftConfig::default(),
    };

    let options = checked_options(cli, config.search.clone())?;

    info!("Searching for: {}", options.term);

    let target = resolve_target(cli, &config.connection).await?;
    let adapter_options = MySqlAdapterOptions {
        max_connections: config
            .connection
            .max_connections
            .max(options.concurrency as u32),
        acquire_timeout: Duration::from_secs(config.connection.acquire_timeout_seconds),
    };
    let schema = MySqlSchema::connect(&target.url, adapter_options).await?;
    info!("Connected to database successfully");

    let schema_name = match target.schema {
        Some(name) => name,
        None => schema.current_schema().await?,
    };

    let searcher = Searcher::new(&schema, &options)?;
    let run = searcher.run(&schema_name).await?;
    schema.close().await;

    let rendered = report::render(&run.results, &options);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.text.as_bytes())?;
    stdout.flush()?;

    if !run.failures.is_empty() {
        warn!("{} tables could not be searched", run.failures.len());
    }
    eprintln!("{}", rendered.summary);

    Ok(())
}

/// Overlay command-line flags on the configured defaults.
pub fn search_options(cli: &Cli, defaults: SearchOptions) -> SearchOptions {
    let mut options = SearchOptions {
        term: cli.term.clone(),
        dry_run: cli.dry_run,
        ..defaults
    };

    if let Some(limit) = cli.limit {
        options.row_limit_per_table = limit as usize;
    }
    if !cli.include.is_empty() {
        options.include = cli.include.clone();
    }
    if !cli.exclude.is_empty() {
        options.exclude = cli.exclude.clone();
    }
    if let Some(limit) = cli.column_limit {
        options.column_display_limit = limit as usize;
    }
    if let Some(length) = cli.truncate_length {
        options.truncate_length = length as usize;
    }
    if cli.no_truncate {
        options.truncate = false;
    }
    if let Some(column_match) = cli.column_match {
        options.column_match = column_match.into();
    }
    if let Some(timeout) = cli.timeout {
        options.query_timeout_secs = timeout;
    }
    if let Some(jobs) = cli.jobs {
        options.concurrency = jobs as usize;
    }

    // `--include=a,` yields an empty entry that would only match an empty name.
    options.include.retain(|p| !p.is_empty());
    options.exclude.retain(|p| !p.is_empty());

    options
}

/// Merge flags over `defaults` and reject bad values or malformed table
/// patterns before anything touches the network.
pub fn checked_options(cli: &Cli, defaults: SearchOptions) -> Result<SearchOptions, SearchError> {
    let options = search_options(cli, defaults);
    options.validate()?;
    TableFilter::from_options(&options)?;
    Ok(options)
}

/// Pick the connection: `--ddev`, then `--database-url`/`DATABASE_URL`, then the config file.
async fn resolve_target(cli: &Cli, config: &ConnectionConfig) -> Result<Target, ConnectionError> {
    let discovered = if cli.ddev {
        Some(ddev::discover().await?)
    } else {
        None
    };
    select_target(cli, config, discovered.as_ref())
}

fn select_target(
    cli: &Cli,
    config: &ConnectionConfig,
    discovered: Option<&ConnectionConfig>,
) -> Result<Target, ConnectionError> {
    let (url, configured_schema) = if let Some(ddev) = discovered {
        let url = ddev
            .connection_string()
            .ok_or(ConnectionError::NotConfigured)?;
        (url, ddev.database.clone())
    } else if let Some(url) = &cli.database_url {
        (url.clone(), None)
    } else if let Some(url) = config.connection_string() {
        (url, config.database.clone())
    } else {
        return Err(ConnectionError::NotConfigured);
    };

    let schema = cli
        .schema
        .clone()
        .or(configured_schema)
        .or_else(|| database_from_url(&url));

    Ok(Target { url, schema })
}
