//! Per-job result accumulation

use agentprobe_domain::ResultChunk;
use serde_json::Value;
use tracing::debug;

/// Columns and rows collected across every poll of one job.
///
/// Owned by a single [`JobPoller::run`](super::JobPoller::run) call. Columns
/// are set once by the first chunk that carries a non-empty list; rows only
/// ever grow, in arrival order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Accumulator {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Accumulator {
    /// Empty accumulator with no schema yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the chunks of one poll response into the accumulator.
    pub fn absorb(&mut self, chunks: Vec<ResultChunk>) {
        for chunk in chunks {
            if let Some(names) = chunk.column_names {
                if self.columns.is_empty() {
                    self.columns = names;
                } else if names != self.columns {
                    debug!(
                        ignored = ?names,
                        kept = ?self.columns,
                        "Ignoring column list from later chunk"
                    );
                }
            }
            self.rows.extend(chunk.rows);
        }
    }

    /// Column names of the first chunk that carried any.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows gathered so far, in arrival order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows gathered so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Split into columns and rows.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}
