//! `export-logs`: interaction log table to a CSV file

use std::path::PathBuf;

use agentprobe_domain::JobCompletion;
use anyhow::Result;
use tracing::warn;

use super::ask::write_output;
use crate::context::AppContext;

/// Export the log table to `output` (default `wxo_logs.csv`) and return the path written.
pub async fn run(context: &AppContext, output: Option<PathBuf>) -> Result<PathBuf> {
    let artifact = context.logs.execute(&context.config).await?;
    let output = output.unwrap_or_else(|| PathBuf::from(&artifact.filename));

    write_output(&output, &artifact.bytes)?;

    if artifact.completion == Some(JobCompletion::TimedOut) {
        warn!(rows = artifact.rows, "job still running after the last poll; export may be incomplete");
        println!("Warning: the export job did not finish; {} rows may be incomplete", artifact.rows);
    }
    println!("Wrote {} log rows to {}", artifact.rows, output.display());

    Ok(output)
}
