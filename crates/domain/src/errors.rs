//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for agentprobe
///
/// Each variant is one kind from the run's error taxonomy. `Config` and
/// `Auth` abort a whole run; `Submission`, `Poll` and `RemoteJobFailure`
/// abort one SQL job; `Network`, `Remote` and `InvalidResponse` coming out of
/// a per-item agent call are caught by the batch runner and recorded as that
/// item's status instead of propagating.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Job submission failed: {0}")]
    Submission(String),

    #[error("Remote job failed: {detail} ({rows_accumulated} rows received before failure)")]
    RemoteJobFailure { detail: String, rows_accumulated: usize },

    #[error("Job status request failed: {0}")]
    Poll(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProbeError {
    /// Stable label suitable for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Submission(_) => "submission",
            Self::RemoteJobFailure { .. } => "remote_job_failure",
            Self::Poll(_) => "poll",
            Self::Network(_) => "network",
            Self::Remote { .. } => "remote",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Serialization(_) => "serialization",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether this error must abort the whole run rather than one job or item.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Auth(_))
    }
}

/// Result type alias for agentprobe operations
pub type Result<T> = std::result::Result<T, ProbeError>;
