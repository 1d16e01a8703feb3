use agentprobe_core::{AgentService, AgentTarget};
use agentprobe_domain::{AccessToken, OrchestrateConfig, ProbeError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::types::ChatCompletionRequest;
use crate::http::{service_url, HttpClient};

/// Agent chat client. Sends exactly one request per question.
#[derive(Clone)]
pub struct OrchestrateAgentService {
    http_client: HttpClient,
    api_host: String,
}

impl OrchestrateAgentService {
    /// Adapter for the agent API at `api_host`.
    pub fn new(http_client: HttpClient, api_host: impl Into<String>) -> Self {
        Self { http_client, api_host: api_host.into() }
    }

    /// Adapter for the configured agent API host.
    pub fn from_config(http_client: HttpClient, config: &OrchestrateConfig) -> Self {
        Self::new(http_client, config.api_host.clone())
    }
}

#[async_trait]
impl AgentService for OrchestrateAgentService {
    async fn ask(&self, token: &AccessToken, target: &AgentTarget, question: &str) -> Result<Value> {
        let mut url = service_url(&self.api_host, "")?;
        // Ids are percent-encoded per segment.
        url.path_segments_mut()
            .map_err(|_| ProbeError::Config("agent host cannot carry a path".into()))?
            .pop_if_empty()
            .extend([
                "instances",
                target.instance_id.as_str(),
                "v1",
                "orchestrate",
                target.agent_id.as_str(),
                "chat",
                "completions",
            ]);
        debug!(agent_id = %target.agent_id, "sending question to agent");

        let request = self
            .http_client
            .request(Method::POST, url)
            .bearer_auth(token.as_str())
            .header("Accept", "application/json")
            .json(&ChatCompletionRequest::single_question(question));

        self.http_client.send_json(request).await
    }
}
