//! Batch runner: one agent request per non-blank item, errors kept per item

use std::sync::Arc;

use agentprobe_domain::{AccessToken, BatchItem, ResultRecord};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::answer::extract_answer;
use crate::ports::{AgentService, AgentTarget};

const PREVIEW_CHARS: usize = 50;

/// Runs a list of questions against one agent with a shared token.
#[derive(Clone)]
pub struct BatchRunner {
    agent: Arc<dyn AgentService>,
    concurrency: usize,
}

impl BatchRunner {
    /// Sequential runner: each request completes before the next starts.
    pub fn new(agent: Arc<dyn AgentService>) -> Self {
        Self { agent, concurrency: 1 }
    }

    /// Allow up to `limit` requests in flight. Output order is unaffected.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Maximum number of questions in flight at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Produce one record per item, ordered by item position.
    ///
    /// Blank and non-text items become `Skipped` without a request. A failed
    /// request becomes an `Error: ...` record and the batch carries on.
    pub async fn run(
        &self,
        token: &AccessToken,
        target: &AgentTarget,
        items: &[BatchItem],
    ) -> Vec<ResultRecord> {
        let mut ordered: Vec<&BatchItem> = items.iter().collect();
        ordered.sort_by_key(|item| item.position);
        let total = ordered.len();

        info!(
            total,
            agent_id = %target.agent_id,
            concurrency = self.concurrency,
            "Starting batch"
        );

        let pending: Vec<_> = ordered
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.process(token, target, item, index + 1, total))
            .collect();
        let records: Vec<ResultRecord> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let failed = records.iter().filter(|record| record.status.is_error()).count();
        info!(total, failed, "Batch finished");
        records
    }

    async fn process(
        &self,
        token: &AccessToken,
        target: &AgentTarget,
        item: &BatchItem,
        number: usize,
        total: usize,
    ) -> ResultRecord {
        let Some(question) = item.prompt() else {
            info!(item = number, total, "Skipping empty question");
            return ResultRecord::skipped();
        };

        info!(item = number, total, question = %preview(question), "Asking agent");

        match self.agent.ask(token, target, question).await {
            Ok(response) => ResultRecord::success(question, extract_answer(&response)),
            Err(err) => {
                warn!(item = number, total, error = %err, kind = err.label(), "Agent request failed");
                ResultRecord::failed(question, err)
            }
        }
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
