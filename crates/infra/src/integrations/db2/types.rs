//! Db2 REST API wire types
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the password login.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub userid: &'a str,
    pub password: &'a str,
}

/// Answer of the password login.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
}

/// Body of a job submission.
#[derive(Debug, Serialize)]
pub struct SubmitJobRequest<'a> {
    pub commands: &'a str,
    pub limit: u32,
    pub separator: &'a str,
    /// The service expects `"yes"` / `"no"`, not a boolean.
    pub stop_on_error: &'static str,
}

/// Answer of a job submission.
#[derive(Debug, Deserialize)]
pub struct SubmitJobResponse {
    pub id: Option<String>,
}

/// Answer of a job poll.
#[derive(Debug, Deserialize)]
pub struct JobStatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<ResultChunkBody>,
}

/// One result set of a job poll.
#[derive(Debug, Default, Deserialize)]
pub struct ResultChunkBody {
    #[serde(rename = "columnNames", alias = "columns")]
    pub column_names: Option<Vec<String>>,
    #[serde(default)]
    pub rows: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    pub error: Option<Value>,
}
