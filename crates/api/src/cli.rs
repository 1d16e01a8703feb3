//! `agentprobe` command line

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use agentprobe_infra::{config, init_logging, LogFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, ask::AskArgs, invoke::FunctionName};
use crate::context::AppContext;
use crate::server;
use crate::utils::logging::log_command_execution;

/// Parsed `agentprobe` command line.
#[derive(Debug, Parser)]
#[command(
    name = "agentprobe",
    version,
    about = "Batch-test a conversational agent and manage its interaction log",
    after_help = "Examples:\n  agentprobe ask questions.csv\n  agentprobe export-logs --output logs.csv\n  agentprobe invoke request.json --function batch\n  agentprobe serve --addr 0.0.0.0:8080"
)]
pub struct Cli {
    /// Switch log output to JSON lines.
    #[arg(long, global = true, help = "Emit log lines as JSON")]
    pub log_json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `agentprobe`.
#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Ask every question of a CSV file and write the answers to a results CSV")]
    Ask {
        #[arg(help = "Questions CSV (default: questions.csv)")]
        input: Option<PathBuf>,
        #[arg(help = "Results CSV (default: results.csv, or results_<timestamp>.csv with an input)")]
        output: Option<PathBuf>,
        #[arg(long = "agent", help = "Agent id (default: WXO_AGENT_ID)")]
        agent_id: Option<String>,
    },
    #[command(about = "Export the most recent interaction log rows to CSV")]
    ExportLogs {
        #[arg(long, short, help = "Output file (default: wxo_logs.csv)")]
        output: Option<PathBuf>,
    },
    #[command(about = "Run one function with a JSON request and print its response envelope")]
    Invoke {
        #[arg(help = "Request JSON file (default: stdin)")]
        request: Option<PathBuf>,
        #[arg(long, short, value_enum, default_value_t = FunctionName::Batch)]
        function: FunctionName,
    },
    #[command(about = "Record one interaction in the log table")]
    Record {
        #[arg(help = "Interaction JSON file (default: stdin)")]
        request: Option<PathBuf>,
    },
    #[command(about = "Serve the functions over HTTP")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Ask { .. } => "ask",
            Self::ExportLogs { .. } => "export-logs",
            Self::Invoke { .. } => "invoke",
            Self::Record { .. } => "record",
            Self::Serve { .. } => "serve",
        }
    }
}

/// Parse arguments, run the command and map the outcome to an exit code.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.log_json { LogFormat::Json } else { LogFormat::Pretty });

    let name = cli.command.name();
    let started = Instant::now();
    let result = execute(cli.command).await;
    log_command_execution(name, started.elapsed(), matches!(result, Ok(true)));

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run one command. `Ok(false)` means the command ran but reported failure.
async fn execute(command: Command) -> Result<bool> {
    let context = AppContext::new(config::load()?)?;

    match command {
        Command::Ask { input, output, agent_id } => {
            commands::ask::run(&context, AskArgs { input, output, agent_id }).await?;
            Ok(true)
        }
        Command::ExportLogs { output } => {
            commands::export_logs::run(&context, output).await?;
            Ok(true)
        }
        Command::Invoke { request, function } => {
            let response = commands::invoke::run(&context, function, request.as_deref()).await?;
            Ok(response.status_code < 400)
        }
        Command::Record { request } => {
            let response =
                commands::invoke::run(&context, FunctionName::Record, request.as_deref()).await?;
            Ok(response.status_code < 400)
        }
        Command::Serve { addr } => {
            server::serve(addr, Arc::new(context)).await?;
            Ok(true)
        }
    }
}
