//! `invoke` and `record`: run one function and print its response envelope

use std::path::Path;

use agentprobe_domain::FunctionResponse;
use anyhow::{Context, Result};
use clap::ValueEnum;

use super::read_request;
use crate::context::AppContext;

/// Function reachable through `invoke`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FunctionName {
    /// Batch questions to an agent (`{agent_id, questions}`)
    #[default]
    Batch,
    /// Export the interaction log (request body ignored)
    Logs,
    /// Record one interaction
    Record,
}

/// Run `function` with the request from `path` (or stdin) and print the
/// envelope as JSON.
pub async fn run(
    context: &AppContext,
    function: FunctionName,
    path: Option<&Path>,
) -> Result<FunctionResponse> {
    let response = match function {
        FunctionName::Batch => {
            let request = read_request(path)?;
            context.batch.handle(&context.config, &request).await
        }
        FunctionName::Logs => context.logs.handle(&context.config).await,
        FunctionName::Record => {
            let request = read_request(path)?;
            context.record.handle(&context.config, &request).await
        }
    };

    let rendered = serde_json::to_string_pretty(&response).context("failed to render response")?;
    println!("{rendered}");
    Ok(response)
}
