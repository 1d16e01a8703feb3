//! Function boundary: JSON request in, `{statusCode, headers, body}` out
//!
//! Every handler always produces a response. Missing request fields are a
//! `400`; missing configuration and every downstream fault are a `500` with
//! a short `{"error": ...}` body.

pub mod batch;
pub mod logs;
pub mod record;

#[cfg(test)]
pub(crate) mod test_support;

use agentprobe_domain::{FunctionResponse, ProbeError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::export::json_error;

pub use batch::BatchFunction;
pub use logs::LogExportFunction;
pub use record::{RecordInteractionFunction, RecordedInteraction};

/// Status code a failed run is reported with.
pub fn status_for(err: &ProbeError) -> u16 {
    match err {
        ProbeError::InvalidInput(_) => 400,
        _ => 500,
    }
}

/// JSON error response for a failed run.
pub fn error_response(err: &ProbeError) -> FunctionResponse {
    let message = match err {
        ProbeError::Config(message) | ProbeError::InvalidInput(message) => message.clone(),
        other => other.to_string(),
    };
    json_error(status_for(err), message)
}

/// Decode a request given either as a JSON value or as a string holding JSON.
fn parse_request<T: DeserializeOwned>(request: &Value) -> Result<T> {
    let parsed = match request {
        Value::String(text) => serde_json::from_str(text),
        other => serde_json::from_value(other.clone()),
    };
    parsed.map_err(|e| ProbeError::InvalidInput(format!("Invalid request body: {e}")))
}
