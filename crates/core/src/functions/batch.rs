//! Batch question function: `{agent_id, questions}` in, results CSV out

use std::sync::Arc;

use agentprobe_domain::{BatchItem, BatchRequest, Config, FunctionResponse, ProbeError, Result};
use serde_json::Value;
use tracing::{error, info};

use super::{error_response, parse_request};
use crate::auth::TokenProvider;
use crate::batch::BatchRunner;
use crate::export::{ExportArtifact, ResultExporter};
use crate::ports::{AgentService, AgentTarget, IdentityService};

/// Runs one batch request end to end.
#[derive(Clone)]
pub struct BatchFunction {
    tokens: TokenProvider,
    runner: BatchRunner,
    exporter: ResultExporter,
}

impl BatchFunction {
    /// Function that asks `agent` with tokens from `identity`.
    pub fn new(identity: Arc<dyn IdentityService>, agent: Arc<dyn AgentService>) -> Self {
        Self {
            tokens: TokenProvider::new(identity),
            runner: BatchRunner::new(agent),
            exporter: ResultExporter::new(),
        }
    }

    /// Ask up to `limit` questions at once.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.runner = self.runner.with_concurrency(limit);
        self
    }

    /// Handle a request and always return a response.
    pub async fn handle(&self, config: &Config, request: &Value) -> FunctionResponse {
        match self.execute(config, request).await {
            Ok(artifact) => artifact.into_response(),
            Err(err) => {
                error!(error = %err, kind = err.label(), "Batch function failed");
                error_response(&err)
            }
        }
    }

    /// Validate, authenticate once, run every question and encode the results.
    ///
    /// Checks run in this order and nothing is sent before they pass:
    /// configuration, `agent_id`, `questions`.
    pub async fn execute(&self, config: &Config, request: &Value) -> Result<ExportArtifact> {
        config.agent_settings()?;
        let request: BatchRequest = parse_request(request)?;

        let agent_id = request
            .agent_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProbeError::InvalidInput("Missing required parameter: agent_id".into()))?;

        if request.questions.is_empty() {
            return Err(ProbeError::InvalidInput("No questions provided".into()));
        }

        let items: Vec<BatchItem> = request
            .questions
            .iter()
            .enumerate()
            .map(|(position, value)| BatchItem::from_value(position, value))
            .collect();

        self.run_items(config, agent_id, &items).await
    }

    /// Run already decoded items against one agent.
    pub async fn run_items(
        &self,
        config: &Config,
        agent_id: &str,
        items: &[BatchItem],
    ) -> Result<ExportArtifact> {
        let settings = config.agent_settings()?;
        let token = self.tokens.acquire(&settings.credential).await?;
        let target = AgentTarget::new(settings.instance_id, agent_id);

        info!(questions = items.len(), agent_id, "Processing batch request");
        let records = self.runner.run(&token, &target, items).await;

        self.exporter.export_batch(&records)
    }
}

#[cfg(test)]
mod tests {
    use agentprobe_domain::constants::UTF8_BOM;
    use serde_json::json;

    use super::*;
    use crate::functions::test_support::{agent_config, FakeAgent, FakeIdentity};

    fn function(identity: &Arc<FakeIdentity>, agent: &Arc<FakeAgent>) -> BatchFunction {
        BatchFunction::new(identity.clone(), agent.clone())
    }

    fn error_message(response: &FunctionResponse) -> String {
        let body: Value = serde_json::from_str(&response.body).unwrap();
        body["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn answers_every_question_as_csv() {
        let identity = Arc::new(FakeIdentity::ok());
        let agent = Arc::new(FakeAgent { fail_on: vec!["Explain Y".into()], ..FakeAgent::default() });

        let response = function(&identity, &agent)
            .handle(
                &agent_config(),
                &json!({"agent_id": "agent-9", "questions": ["What is X?", "  ", "Explain Y"]}),
            )
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(identity.calls(), 1);
        assert_eq!(response.header("Content-Type"), Some("text/csv; charset=utf-8"));

        let body = response.body.strip_prefix('\u{feff}').unwrap();
        assert_eq!(
            body,
            "\"Question\",\"Answer\",\"Status\"\r\n\
             \"What is X?\",\"A: What is X?\",\"Success\"\r\n\
             \"\",\"\",\"Skipped\"\r\n\
             \"Explain Y\",\"\",\"Error: HTTP 500: agent unavailable\"\r\n"
        );

        let asked = agent.asked.lock().unwrap();
        assert_eq!(asked.len(), 2);
        assert_eq!(asked[0].0, AgentTarget::new("inst-1", "agent-9"));
    }

    #[tokio::test]
    async fn missing_configuration_is_500_without_any_call() {
        let identity = Arc::new(FakeIdentity::ok());
        let agent = Arc::new(FakeAgent::default());

        let response = function(&identity, &agent)
            .handle(&Config::default(), &json!({"agent_id": "a", "questions": ["q"]}))
            .await;

        assert_eq!(response.status_code, 500);
        assert_eq!(
            error_message(&response),
            "Missing required environment variables (IBM_CLOUD_API_KEY, WXO_INSTANCE_ID)"
        );
        assert_eq!(identity.calls(), 0);
        assert_eq!(agent.calls(), 0);
    }

    #[tokio::test]
    async fn missing_agent_id_is_400() {
        let identity = Arc::new(FakeIdentity::ok());
        let agent = Arc::new(FakeAgent::default());

        let response = function(&identity, &agent)
            .handle(&agent_config(), &json!({"agent_id": " ", "questions": ["q"]}))
            .await;

        assert_eq!(response.status_code, 400);
        assert_eq!(error_message(&response), "Missing required parameter: agent_id");
        assert_eq!(identity.calls(), 0);
    }

    #[tokio::test]
    async fn empty_question_list_is_400() {
        let identity = Arc::new(FakeIdentity::ok());
        let agent = Arc::new(FakeAgent::default());

        let response =
            function(&identity, &agent).handle(&agent_config(), &json!({"agent_id": "a"})).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(error_message(&response), "No questions provided");
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let identity = Arc::new(FakeIdentity::ok());
        let agent = Arc::new(FakeAgent::default());

        let response = function(&identity, &agent)
            .handle(&agent_config(), &json!({"agent_id": "a", "questions": "not a list"}))
            .await;

        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn auth_failure_is_500_and_no_question_is_sent() {
        let identity =
            Arc::new(FakeIdentity::failing(ProbeError::Remote { status: 400, message: "bad key".into() }));
        let agent = Arc::new(FakeAgent::default());

        let response = function(&identity, &agent)
            .handle(&agent_config(), &json!({"agent_id": "a", "questions": ["q1", "q2"]}))
            .await;

        assert_eq!(response.status_code, 500);
        assert!(error_message(&response).starts_with("Authentication error"));
        assert_eq!(agent.calls(), 0);
    }

    #[tokio::test]
    async fn non_text_questions_are_skipped() {
        let identity = Arc::new(FakeIdentity::ok());
        let agent = Arc::new(FakeAgent::default());

        let artifact = function(&identity, &agent)
            .execute(&agent_config(), &json!({"agent_id": "a", "questions": [7, null, "ok"]}))
            .await
            .unwrap();

        assert!(artifact.bytes.starts_with(UTF8_BOM));
        assert_eq!(artifact.rows, 3);
        assert_eq!(agent.calls(), 1);
    }
}
