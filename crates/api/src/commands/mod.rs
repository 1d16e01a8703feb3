//! CLI commands

pub mod ask;
pub mod export_logs;
pub mod invoke;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a JSON request from `path`, or from stdin when no path is given.
///
/// Text that is not JSON is passed on as a string so the function reports it.
pub(crate) fn read_request(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("failed to read request from stdin")?;
            text
        }
    };

    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
