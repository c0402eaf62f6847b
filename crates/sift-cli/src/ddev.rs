//! DDEV project database discovery.
//!
//! `ddev describe -j` reports the project's database credentials and the host
//! port the database container is published on.

use serde::Deserialize;
use sift_core::{ConnectionConfig, ConnectionError};
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct DdevDescribe {
    raw: DdevRaw,
}

#[derive(Debug, Deserialize)]
struct DdevRaw {
    dbinfo: DdevDbInfo,
}

#[derive(Debug, Deserialize)]
struct DdevDbInfo {
    published_port: u16,
    username: String,
    password: String,
    dbname: String,
}

/// Run `ddev describe -j` and turn its database section into a connection config.
pub async fn discover() -> Result<ConnectionConfig, ConnectionError> {
    let output = Command::new("ddev")
        .args(["describe", "-j"])
        .output()
        .await
        .map_err(|e| ConnectionError::Discovery(format!("failed to run ddev describe: {}", e)))?;

    if !output.status.success() {
        return Err(ConnectionError::Discovery(format!(
            "ddev describe exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    parse_describe(&output.stdout)
}

/// Parse `ddev describe -j` output.
pub fn parse_describe(json: &[u8]) -> Result<ConnectionConfig, ConnectionError> {
    let describe: DdevDescribe = serde_json::from_slice(json)
        .map_err(|e| ConnectionError::Discovery(format!("failed to parse ddev output: {}", e)))?;
    let db = describe.raw.dbinfo;

    Ok(ConnectionConfig {
        host: Some("127.0.0.1".to_string()),
        port: db.published_port,
        database: Some(db.dbname),
        username: db.username,
        password: Some(db.password),
        ..Default::default()
    })
}
