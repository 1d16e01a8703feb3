//! Configuration loader
//!
//! ## Loading Strategy
//! 1. `.env` in the working directory populates the process environment
//!    (variables already set win)
//! 2. When `AGENTPROBE_CONFIG` names a file, it provides the base values
//!    (JSON or TOML, detected by extension); otherwise built-in defaults do
//! 3. Environment variables override both
//!
//! Values are trimmed; blank values count as unset.
//!
//! ## Environment Variables
//! - `IBM_CLOUD_API_KEY`, `IAM_TOKEN_URL`
//! - `WXO_INSTANCE_ID`, `WXO_AGENT_ID`, `WXO_API_HOST`
//! - `DB2_HOSTNAME`, `DB2_USERID`, `DB2_PASSWORD` (fallback `PASSWORD`),
//!   `DB2_DEPLOYMENT_ID`, `DB2_SCHEMA`, `DB2_LOG_TABLE`, `DB2_ROW_LIMIT`
//! - `AGENTPROBE_POLL_ATTEMPTS`, `AGENTPROBE_POLL_INTERVAL_MS`
//! - `AGENTPROBE_CONCURRENCY`
//! - `AGENTPROBE_HTTP_TIMEOUT_SECS`, `AGENTPROBE_USER_AGENT`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use agentprobe_domain::{Config, ProbeError, Result};

/// Names the optional config file.
pub const CONFIG_PATH_VAR: &str = "AGENTPROBE_CONFIG";

/// Load configuration from `.env`, the optional config file and the
/// environment.
///
/// # Errors
/// Returns `ProbeError::Config` if the config file named by
/// `AGENTPROBE_CONFIG` is missing or invalid, or if a numeric variable does
/// not parse.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let mut config = match env_value(CONFIG_PATH_VAR, |key| std::env::var(key)) {
        Some(path) => load_from_file(Some(PathBuf::from(path)))?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config)?;
    tracing::info!("Configuration loaded");
    Ok(config)
}

/// Built-in defaults overridden by environment variables only.
///
/// # Errors
/// Returns `ProbeError::Config` if a numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// Supports both JSON and TOML formats (detected by file extension).
/// Sections and fields the file leaves out keep their defaults.
///
/// # Errors
/// Returns `ProbeError::Config` if:
/// - No path is given
/// - File not found
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path
        .ok_or_else(|| ProbeError::Config(format!("No config file given ({CONFIG_PATH_VAR})")))?;

    if !config_path.exists() {
        return Err(ProbeError::Config(format!(
            "Config file not found: {}",
            config_path.display()
        )));
    }

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ProbeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Override `config` with the process environment.
///
/// # Errors
/// Returns `ProbeError::Config` if a numeric variable does not parse.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides(config, |key| std::env::var(key))
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ProbeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ProbeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ProbeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn apply_overrides<F, E>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> std::result::Result<String, E>,
{
    let var = |key: &str| env_value(key, &lookup);

    if let Some(value) = var("IBM_CLOUD_API_KEY") {
        config.iam.api_key = Some(value);
    }
    if let Some(value) = var("IAM_TOKEN_URL") {
        config.iam.token_url = value;
    }

    if let Some(value) = var("WXO_INSTANCE_ID") {
        config.orchestrate.instance_id = Some(value);
    }
    if let Some(value) = var("WXO_AGENT_ID") {
        config.orchestrate.agent_id = Some(value);
    }
    if let Some(value) = var("WXO_API_HOST") {
        config.orchestrate.api_host = value;
    }

    if let Some(value) = var("DB2_HOSTNAME") {
        config.db2.hostname = Some(value);
    }
    if let Some(value) = var("DB2_USERID") {
        config.db2.userid = Some(value);
    }
    if let Some(value) = var("DB2_PASSWORD").or_else(|| var("PASSWORD")) {
        config.db2.password = Some(value);
    }
    if let Some(value) = var("DB2_DEPLOYMENT_ID") {
        config.db2.deployment_id = Some(value);
    }
    if let Some(value) = var("DB2_SCHEMA") {
        config.db2.schema = Some(value);
    }
    if let Some(value) = var("DB2_LOG_TABLE") {
        config.db2.table = value;
    }
    if let Some(value) = parsed(&var, "DB2_ROW_LIMIT")? {
        config.db2.row_limit = value;
    }

    if let Some(value) = parsed(&var, "AGENTPROBE_POLL_ATTEMPTS")? {
        config.polling.max_attempts = value;
    }
    if let Some(value) = parsed(&var, "AGENTPROBE_POLL_INTERVAL_MS")? {
        config.polling.interval_ms = value;
    }
    if let Some(value) = parsed(&var, "AGENTPROBE_CONCURRENCY")? {
        config.batch.concurrency = value;
    }
    if let Some(value) = parsed(&var, "AGENTPROBE_HTTP_TIMEOUT_SECS")? {
        config.http.timeout_secs = value;
    }
    if let Some(value) = var("AGENTPROBE_USER_AGENT") {
        config.http.user_agent = value;
    }

    Ok(())
}

/// Trimmed, non-blank value of a variable.
fn env_value<F, E>(key: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> std::result::Result<String, E>,
{
    lookup(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parsed<T, V>(var: &V, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ProbeError::Config(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}
