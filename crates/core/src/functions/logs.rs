//! Log export function: interaction table as a CSV download

use std::sync::Arc;

use agentprobe_domain::{Config, FunctionResponse, Result, SqlJobRequest};
use tracing::{error, info, warn};

use super::error_response;
use crate::auth::TokenProvider;
use crate::export::{ExportArtifact, ResultExporter};
use crate::jobs::JobPoller;
use crate::logbook::select_recent_sql;
use crate::ports::IdentityService;

/// Exports the interaction log table through one SQL job.
#[derive(Clone)]
pub struct LogExportFunction {
    tokens: TokenProvider,
    poller: JobPoller,
    exporter: ResultExporter,
}

impl LogExportFunction {
    /// Function that exports through `poller` with tokens from `identity`.
    pub fn new(identity: Arc<dyn IdentityService>, poller: JobPoller) -> Self {
        Self { tokens: TokenProvider::new(identity), poller, exporter: ResultExporter::new() }
    }

    /// Run the export and wrap the result or the failure in a response envelope.
    pub async fn handle(&self, config: &Config) -> FunctionResponse {
        match self.execute(config).await {
            Ok(artifact) => artifact.into_response(),
            Err(err) => {
                error!(error = %err, kind = err.label(), "Log export failed");
                error_response(&err)
            }
        }
    }

    /// Run the export. A job that is still running after the last poll is
    /// exported with the rows received so far and marked `timed_out`.
    pub async fn execute(&self, config: &Config) -> Result<ExportArtifact> {
        let settings = config.sql_settings()?;
        let token = self.tokens.acquire(&settings.credential).await?;

        let request =
            SqlJobRequest::new(select_recent_sql(&config.log_table_name()), config.db2.row_limit);
        let outcome = self.poller.run(&token, &request).await?;

        if outcome.is_complete() {
            info!(rows = outcome.rows.len(), columns = outcome.columns.len(), "Log export ready");
        } else {
            warn!(rows = outcome.rows.len(), polls = outcome.polls, "Log export may be incomplete");
        }

        self.exporter.export_job(&outcome)
    }
}
