//! Conversions from external infrastructure errors into domain errors.

use agentprobe_domain::ProbeError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;
use thiserror::Error;

/// Longest slice of a remote error body carried into a domain error.
const MAX_REMOTE_MESSAGE_CHARS: usize = 200;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub ProbeError);

impl From<InfraError> for ProbeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ProbeError> for InfraError {
    fn from(value: ProbeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoProbeError {
    fn into_probe(self) -> ProbeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ProbeError */
/* -------------------------------------------------------------------------- */

impl IntoProbeError for HttpError {
    fn into_probe(self) -> ProbeError {
        if self.is_timeout() {
            return ProbeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ProbeError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return ProbeError::Remote {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        if self.is_decode() {
            return ProbeError::InvalidResponse(format!("response body is not valid JSON: {self}"));
        }

        if self.is_builder() {
            return ProbeError::Internal(format!("invalid HTTP request: {self}"));
        }

        ProbeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_probe())
    }
}

/// Domain error for a non-success response, carrying the start of its body.
pub fn remote_error(status: StatusCode, body: &str) -> ProbeError {
    let body = body.trim();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body.chars().take(MAX_REMOTE_MESSAGE_CHARS).collect()
    };
    ProbeError::Remote { status: status.as_u16(), message }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
