//! Port interfaces for the remote services
//!
//! Adapters live in `agentprobe-infra`; tests implement these traits with
//! in-memory fakes.

use agentprobe_domain::{AccessToken, Credential, JobHandle, JobSnapshot, Result, SqlJobRequest};
use async_trait::async_trait;
use serde_json::Value;

/// Exchanges a long-lived credential for a bearer token.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Issue a token. Implementations send exactly one request per call and
    /// never cache.
    async fn issue_token(&self, credential: &Credential) -> Result<AccessToken>;
}

/// Asynchronous SQL execution service.
#[async_trait]
pub trait SqlJobService: Send + Sync {
    /// Submit a job and return its handle.
    async fn submit(&self, token: &AccessToken, request: &SqlJobRequest) -> Result<JobHandle>;

    /// Fetch the current state of a submitted job.
    async fn poll(&self, token: &AccessToken, handle: &JobHandle) -> Result<JobSnapshot>;
}

/// Conversational agent answering one question per call.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Ask one question and return the raw response envelope.
    async fn ask(&self, token: &AccessToken, target: &AgentTarget, question: &str)
        -> Result<Value>;
}

/// Which agent of which service instance a batch talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTarget {
    /// Service instance hosting the agent.
    pub instance_id: String,
    /// Agent to ask.
    pub agent_id: String,
}

impl AgentTarget {
    /// Target for `agent_id` in `instance_id`.
    pub fn new(instance_id: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self { instance_id: instance_id.into(), agent_id: agent_id.into() }
    }
}
