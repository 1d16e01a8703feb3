//! Asynchronous SQL job types
//!
//! A job is submitted once ([`SqlJobRequest`] → [`JobHandle`]) and then
//! polled; each poll yields a [`JobSnapshot`] whose chunks stream result rows
//! incrementally.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::SQL_STATEMENT_SEPARATOR;
use crate::impl_domain_status_conversions;

/// Identifier returned by the SQL job service on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    /// Handle for the job id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Job id as sent by the service.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote job state as reported by one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl_domain_status_conversions!(JobStatus {
    Pending => "pending",
    Running => "running",
    Completed => "completed",
    Failed => "failed",
});

/// One result chunk of a poll response.
///
/// `column_names` is only meaningful the first time a job reports it; rows
/// are aligned to that column list by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultChunk {
    /// Column names, when this chunk carries them.
    pub column_names: Option<Vec<String>>,
    /// Positional rows.
    pub rows: Vec<Vec<Value>>,
    /// Statement error reported for this chunk.
    pub error: Option<String>,
}

/// One poll response.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    /// Reported status.
    pub status: JobStatus,
    /// Result chunks returned with this poll.
    pub chunks: Vec<ResultChunk>,
}

impl JobSnapshot {
    /// Snapshot of one poll response.
    pub fn new(status: JobStatus, chunks: Vec<ResultChunk>) -> Self {
        Self { status, chunks }
    }

    /// Error detail reported by the service, joined across chunks.
    pub fn failure_detail(&self) -> Option<String> {
        let details: Vec<&str> = self
            .chunks
            .iter()
            .filter_map(|chunk| chunk.error.as_deref())
            .filter(|detail| !detail.trim().is_empty())
            .collect();

        if details.is_empty() {
            None
        } else {
            Some(details.join("; "))
        }
    }
}

/// Work submitted to the SQL job service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlJobRequest {
    /// SQL text.
    pub commands: String,
    /// Row limit.
    pub limit: u32,
    /// Statement separator.
    pub separator: String,
    /// Stop at the first failing statement.
    pub stop_on_error: bool,
}

impl SqlJobRequest {
    /// Request with the service defaults (`;` separator, stop on first error).
    pub fn new(commands: impl Into<String>, limit: u32) -> Self {
        Self {
            commands: commands.into(),
            limit,
            separator: SQL_STATEMENT_SEPARATOR.to_string(),
            stop_on_error: true,
        }
    }
}

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCompletion {
    /// The service reported `completed`; rows are the full result.
    Completed,
    /// The attempt ceiling was reached first; rows may be incomplete.
    TimedOut,
}

impl_domain_status_conversions!(JobCompletion {
    Completed => "completed",
    TimedOut => "timed_out",
});

/// Result of running one job to completion or to the attempt ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    /// First-sighted column names.
    pub columns: Vec<String>,
    /// Every row gathered, in arrival order.
    pub rows: Vec<Vec<Value>>,
    /// Whether the job finished.
    pub completion: JobCompletion,
    /// Polls made.
    pub polls: u32,
}

impl JobOutcome {
    /// The job reported completion.
    pub fn is_complete(&self) -> bool {
        self.completion == JobCompletion::Completed
    }
}
