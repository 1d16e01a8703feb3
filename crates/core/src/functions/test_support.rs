//! In-memory service fakes shared by the function tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use agentprobe_domain::{
    AccessToken, Config, Credential, JobHandle, JobSnapshot, JobStatus, ProbeError, Result,
    SqlJobRequest,
};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::ports::{AgentService, AgentTarget, IdentityService, SqlJobService};

pub(crate) struct FakeIdentity {
    pub calls: AtomicUsize,
    pub reply: Result<AccessToken>,
}

impl FakeIdentity {
    pub fn ok() -> Self {
        Self { calls: AtomicUsize::new(0), reply: Ok(AccessToken::new("token")) }
    }

    pub fn failing(err: ProbeError) -> Self {
        Self { calls: AtomicUsize::new(0), reply: Err(err) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityService for FakeIdentity {
    async fn issue_token(&self, _credential: &Credential) -> Result<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

#[derive(Default)]
pub(crate) struct FakeAgent {
    pub fail_on: Vec<String>,
    pub asked: Mutex<Vec<(AgentTarget, String)>>,
}

impl FakeAgent {
    pub fn calls(&self) -> usize {
        self.asked.lock().unwrap().len()
    }
}

#[async_trait]
impl AgentService for FakeAgent {
    async fn ask(&self, _token: &AccessToken, target: &AgentTarget, question: &str) -> Result<Value> {
        self.asked.lock().unwrap().push((target.clone(), question.to_string()));
        if self.fail_on.iter().any(|q| q == question) {
            return Err(ProbeError::Remote { status: 500, message: "agent unavailable".into() });
        }
        Ok(json!({"choices": [{"message": {"content": format!("A: {question}")}}]}))
    }
}

#[derive(Default)]
pub(crate) struct FakeSqlJobs {
    pub submitted: Mutex<Vec<SqlJobRequest>>,
    pub polls: Mutex<VecDeque<JobSnapshot>>,
    pub poll_calls: AtomicUsize,
}

impl FakeSqlJobs {
    pub fn with_polls(polls: Vec<JobSnapshot>) -> Self {
        Self { polls: Mutex::new(polls.into()), ..Self::default() }
    }

    pub fn submitted(&self) -> Vec<SqlJobRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlJobService for FakeSqlJobs {
    async fn submit(&self, _token: &AccessToken, request: &SqlJobRequest) -> Result<JobHandle> {
        self.submitted.lock().unwrap().push(request.clone());
        Ok(JobHandle::new("job-7"))
    }

    async fn poll(&self, _token: &AccessToken, _handle: &JobHandle) -> Result<JobSnapshot> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| JobSnapshot::new(JobStatus::Running, Vec::new())))
    }
}

pub(crate) fn agent_config() -> Config {
    let mut config = Config::default();
    config.iam.api_key = Some("api-key".into());
    config.orchestrate.instance_id = Some("inst-1".into());
    config
}

pub(crate) fn sql_config() -> Config {
    let mut config = Config::default();
    config.db2.hostname = Some("db.example.com".into());
    config.db2.userid = Some("bluadmin".into());
    config.db2.password = Some("pw".into());
    config.db2.schema = Some("CLD47628".into());
    config.polling.max_attempts = 3;
    config
}
