//! `ask`: questions CSV in, results CSV out

use std::path::{Path, PathBuf};

use agentprobe_core::CsvCodec;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::context::AppContext;

/// Input file used when none is given.
pub const DEFAULT_INPUT: &str = "questions.csv";
/// Output file used when neither path is given.
pub const DEFAULT_OUTPUT: &str = "results.csv";

/// Arguments of one `ask` run.
#[derive(Debug, Clone, Default)]
pub struct AskArgs {
    /// Questions CSV.
    pub input: Option<PathBuf>,
    /// Results CSV.
    pub output: Option<PathBuf>,
    /// Agent to ask; falls back to the configured agent.
    pub agent_id: Option<String>,
}

/// What an `ask` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskSummary {
    /// File the questions were read from.
    pub input: PathBuf,
    /// File the results were written to.
    pub output: PathBuf,
    /// Header of the column the questions came from.
    pub column: String,
    /// No alias matched and the first column was used.
    pub used_fallback: bool,
    /// Result rows written.
    pub rows: usize,
}

/// Input and output paths.
///
/// No arguments reads `questions.csv` into `results.csv`. An input without an
/// output writes a timestamped `results_<YYYYmmdd_HHMMSS>.csv` so earlier
/// runs are kept.
pub fn resolve_paths(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    now: DateTime<Local>,
) -> (PathBuf, PathBuf) {
    match (input, output) {
        (None, output) => {
            (PathBuf::from(DEFAULT_INPUT), output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)))
        }
        (Some(input), Some(output)) => (input, output),
        (Some(input), None) => {
            let output = PathBuf::from(format!("results_{}.csv", now.format("%Y%m%d_%H%M%S")));
            (input, output)
        }
    }
}

/// Ask every question of the input file and write the results file.
pub async fn run(context: &AppContext, args: AskArgs) -> Result<AskSummary> {
    let (input, output) = resolve_paths(args.input, args.output, Local::now());

    let agent_id = args
        .agent_id
        .or_else(|| context.config.orchestrate.agent_id.clone())
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .context("no agent id given (use --agent or set WXO_AGENT_ID)")?;

    let bytes = std::fs::read(&input)
        .with_context(|| format!("failed to read input file {}", input.display()))?;
    let table = CsvCodec::quote_all().decode(&bytes)?;
    let selection = table.questions()?;

    if selection.used_fallback {
        warn!(column = %selection.column, "no question column header found; using the first column");
        println!(
            "Warning: no question column found in {}; using first column '{}'",
            input.display(),
            selection.column
        );
    }

    if selection.items.is_empty() {
        bail!("no questions found in {}", input.display());
    }

    info!(input = %input.display(), questions = selection.items.len(), "Running question batch");
    let artifact = context.batch.run_items(&context.config, &agent_id, &selection.items).await?;

    write_output(&output, &artifact.bytes)?;
    println!("Wrote {} results to {}", artifact.rows, output.display());

    Ok(AskSummary {
        input,
        output,
        column: selection.column,
        used_fallback: selection.used_fallback,
        rows: artifact.rows,
    })
}

pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 10, 9, 5, 7).unwrap()
    }

    #[test]
    fn defaults_without_arguments() {
        let (input, output) = resolve_paths(None, None, fixed_now());
        assert_eq!(input, PathBuf::from("questions.csv"));
        assert_eq!(output, PathBuf::from("results.csv"));
    }

    #[test]
    fn input_only_gets_timestamped_output() {
        let (input, output) = resolve_paths(Some("q.csv".into()), None, fixed_now());
        assert_eq!(input, PathBuf::from("q.csv"));
        assert_eq!(output, PathBuf::from("results_20250110_090507.csv"));
    }

    #[test]
    fn explicit_paths_are_kept() {
        let (input, output) =
            resolve_paths(Some("in.csv".into()), Some("out.csv".into()), fixed_now());
        assert_eq!((input, output), (PathBuf::from("in.csv"), PathBuf::from("out.csv")));
    }
}
