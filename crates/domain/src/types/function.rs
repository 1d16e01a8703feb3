//! HTTP-style function boundary envelope
//!
//! The batch pipeline is exposed as a function taking a JSON request and
//! returning `{statusCode, headers, body}`; the same envelope is used by the
//! log export and interaction log functions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request accepted by the batch function.
///
/// `questions` stays untyped so that non-text entries can be reported as
/// skipped instead of failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchRequest {
    /// Agent to ask.
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Questions; entries that are not text are skipped.
    #[serde(default)]
    pub questions: Vec<Value>,
}

/// Response envelope returned by every function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// HTTP status.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// CSV or JSON text.
    pub body: String,
}

impl FunctionResponse {
    /// Header value by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
