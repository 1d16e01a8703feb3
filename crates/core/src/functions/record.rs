//! Interaction logbook function: append one chat interaction to the log table

use std::sync::Arc;

use agentprobe_domain::{
    AccessToken, Config, FunctionResponse, InteractionLog, JobHandle, ProbeError, Result,
    SqlJobRequest,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info};

use super::{error_response, parse_request};
use crate::auth::TokenProvider;
use crate::export::json_response;
use crate::jobs::JobPoller;
use crate::logbook::insert_sql;
use crate::ports::IdentityService;

/// What a successful recording returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInteraction {
    /// Job that ran the insert.
    pub job: JobHandle,
    /// Timestamp written to the row.
    pub timestamp: String,
    /// The job reported completion before the poll ceiling.
    pub confirmed: bool,
}

/// Inserts one interaction through a SQL job and waits for the outcome.
#[derive(Clone)]
pub struct RecordInteractionFunction {
    tokens: TokenProvider,
    poller: JobPoller,
}

impl RecordInteractionFunction {
    /// Function that inserts through `poller` with tokens from `identity`.
    pub fn new(identity: Arc<dyn IdentityService>, poller: JobPoller) -> Self {
        Self { tokens: TokenProvider::new(identity), poller }
    }

    /// `201` with `{message, timestamp, jobId, confirmed}` on success. A
    /// statement error is a `500` that still names the job.
    pub async fn handle(&self, config: &Config, request: &Value) -> FunctionResponse {
        match self.execute(config, request).await {
            Ok(recorded) => json_response(
                201,
                &json!({
                    "message": "Successfully inserted",
                    "timestamp": recorded.timestamp,
                    "jobId": recorded.job.as_str(),
                    "confirmed": recorded.confirmed,
                }),
            ),
            Err((err, job)) => {
                error!(error = %err, kind = err.label(), "Recording interaction failed");
                match (err, job) {
                    (ProbeError::RemoteJobFailure { detail, .. }, Some(job)) => {
                        json_response(500, &json!({ "error": detail, "jobId": job.as_str() }))
                    }
                    (err, _) => error_response(&err),
                }
            }
        }
    }

    /// Submit the insert and poll until the job settles.
    ///
    /// `confirmed` is false when the job was still running after the last
    /// poll. The error carries the job handle once one exists.
    pub async fn execute(
        &self,
        config: &Config,
        request: &Value,
    ) -> std::result::Result<RecordedInteraction, (ProbeError, Option<JobHandle>)> {
        let (token, log) = self.prepare(config, request).await.map_err(|err| (err, None))?;

        let request = SqlJobRequest::new(insert_sql(&config.log_table_name(), &log), 1);
        let job = self.poller.submit(&token, &request).await.map_err(|err| (err, None))?;

        let outcome = match self.poller.wait(&token, &job).await {
            Ok(outcome) => outcome,
            Err(err) => return Err((err, Some(job))),
        };

        info!(job_id = %job, confirmed = outcome.is_complete(), "Interaction recorded");
        Ok(RecordedInteraction { job, timestamp: log.timestamp, confirmed: outcome.is_complete() })
    }

    async fn prepare(
        &self,
        config: &Config,
        request: &Value,
    ) -> Result<(AccessToken, InteractionLog)> {
        let settings = config.sql_settings()?;
        if !matches!(request, Value::Object(_) | Value::String(_)) {
            return Err(ProbeError::InvalidInput("Request body must be a JSON object".into()));
        }
        let mut log: InteractionLog = parse_request(request)?;
        log.ensure_timestamp(Utc::now());

        let token = self.tokens.acquire(&settings.credential).await?;
        Ok((token, log))
    }
}
