//! Configuration management
//!
//! [`Config`] is built once at start (see `agentprobe_infra::config`) and
//! passed by reference to everything that needs it. Values that have no
//! sensible default are optional here and checked at the entry of each run
//! by [`Config::agent_settings`] and [`Config::sql_settings`], before any
//! network call is made.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AGENT_API_HOST, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_IAM_TOKEN_URL, DEFAULT_LOG_TABLE,
    DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_ROW_LIMIT, DEFAULT_USER_AGENT,
};
use crate::{Credential, ProbeError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cloud API key login.
    pub iam: IamConfig,
    /// Agent chat service.
    pub orchestrate: OrchestrateConfig,
    pub db2: Db2Config,
    /// SQL job polling.
    pub polling: PollingConfig,
    /// Question batches.
    pub batch: BatchConfig,
    /// Outbound HTTP.
    pub http: HttpConfig,
}

/// Cloud identity service configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IamConfig {
    /// `IBM_CLOUD_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Token endpoint, `IAM_TOKEN_URL`.
    pub token_url: String,
}

/// Agent chat service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrateConfig {
    /// `WXO_INSTANCE_ID`.
    pub instance_id: Option<String>,
    /// Agent used by the CLI when none is given on the command line.
    pub agent_id: Option<String>,
    /// Host, bare or with scheme, `WXO_API_HOST`.
    pub api_host: String,
}

/// SQL job service configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Db2Config {
    /// Host, bare or with scheme, `DB2_HOSTNAME`.
    pub hostname: Option<String>,
    /// `DB2_USERID`.
    pub userid: Option<String>,
    /// `DB2_PASSWORD`, falling back to `PASSWORD`.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Sent as `x-deployment-id` when set.
    pub deployment_id: Option<String>,
    /// Schema qualifying the log table.
    pub schema: Option<String>,
    /// Log table name.
    pub table: String,
    /// Row limit of the export job.
    pub row_limit: u32,
}

/// Job polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Polls before giving up with partial rows.
    pub max_attempts: u32,
    /// Sleep before each poll.
    pub interval_ms: u64,
}

/// Batch runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum in-flight agent requests; `1` keeps the batch sequential.
    pub concurrency: usize,
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// `User-Agent` header; blank sends none.
    pub user_agent: String,
}

impl Default for IamConfig {
    fn default() -> Self {
        Self { api_key: None, token_url: DEFAULT_IAM_TOKEN_URL.to_string() }
    }
}

impl Default for OrchestrateConfig {
    fn default() -> Self {
        Self { instance_id: None, agent_id: None, api_host: DEFAULT_AGENT_API_HOST.to_string() }
    }
}

impl Default for Db2Config {
    fn default() -> Self {
        Self {
            hostname: None,
            userid: None,
            password: None,
            deployment_id: None,
            schema: None,
            table: DEFAULT_LOG_TABLE.to_string(),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_POLL_ATTEMPTS, interval_ms: DEFAULT_POLL_INTERVAL_MS }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl fmt::Debug for IamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl fmt::Debug for Db2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db2Config")
            .field("hostname", &self.hostname)
            .field("userid", &self.userid)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("deployment_id", &self.deployment_id)
            .field("schema", &self.schema)
            .field("table", &self.table)
            .field("row_limit", &self.row_limit)
            .finish()
    }
}

/// Validated settings for the agent batch pipeline.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// API key credential.
    pub credential: Credential,
    /// Service instance hosting the agents.
    pub instance_id: String,
    /// Agent used when a request names none.
    pub default_agent_id: Option<String>,
}

/// Validated settings for the SQL job pipeline.
#[derive(Debug, Clone)]
pub struct SqlSettings {
    /// User and password credential.
    pub credential: Credential,
    /// Database host.
    pub hostname: String,
}

impl Config {
    /// Check the values the agent pipeline cannot run without.
    ///
    /// # Errors
    /// Returns `ProbeError::Config` naming every missing variable.
    pub fn agent_settings(&self) -> Result<AgentSettings> {
        let api_key = present(self.iam.api_key.as_deref());
        let instance_id = present(self.orchestrate.instance_id.as_deref());

        match (api_key, instance_id) {
            (Some(api_key), Some(instance_id)) => Ok(AgentSettings {
                credential: Credential::api_key(api_key),
                instance_id: instance_id.to_string(),
                default_agent_id: present(self.orchestrate.agent_id.as_deref())
                    .map(str::to_string),
            }),
            _ => Err(missing_error(&[
                ("IBM_CLOUD_API_KEY", api_key.is_none()),
                ("WXO_INSTANCE_ID", instance_id.is_none()),
            ])),
        }
    }

    /// Check the values the SQL job pipeline cannot run without.
    ///
    /// # Errors
    /// Returns `ProbeError::Config` naming every missing variable.
    pub fn sql_settings(&self) -> Result<SqlSettings> {
        let hostname = present(self.db2.hostname.as_deref());
        let userid = present(self.db2.userid.as_deref());
        let password = present(self.db2.password.as_deref());

        match (hostname, userid, password) {
            (Some(hostname), Some(userid), Some(password)) => Ok(SqlSettings {
                credential: Credential::user_password(userid, password)
                    .with_deployment(self.db2.deployment_id.clone()),
                hostname: hostname.to_string(),
            }),
            _ => Err(missing_error(&[
                ("DB2_HOSTNAME", hostname.is_none()),
                ("DB2_USERID", userid.is_none()),
                ("DB2_PASSWORD", password.is_none()),
            ])),
        }
    }

    /// Sleep before each poll.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    /// Fully qualified, quoted name of the interaction log table.
    pub fn log_table_name(&self) -> String {
        match present(self.db2.schema.as_deref()) {
            Some(schema) => format!("\"{schema}\".\"{}\"", self.db2.table),
            None => format!("\"{}\"", self.db2.table),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn missing_error(checks: &[(&str, bool)]) -> ProbeError {
    let missing: Vec<&str> =
        checks.iter().filter(|(_, is_missing)| *is_missing).map(|(name, _)| *name).collect();
    ProbeError::Config(format!("Missing required environment variables ({})", missing.join(", ")))
}
