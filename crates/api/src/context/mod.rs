//! Application context - dependency injection container

use std::sync::Arc;

use agentprobe_core::{
    AgentService, BatchFunction, IdentityService, JobPoller, LogExportFunction,
    RecordInteractionFunction, SqlJobService,
};
use agentprobe_domain::{Config, Result};
use agentprobe_infra::{
    Db2IdentityService, Db2SqlJobService, HttpClient, IamIdentityService, OrchestrateAgentService,
};
use tracing::debug;

/// Application context - holds the configuration and the wired functions
pub struct AppContext {
    /// Settings every function reads at call time.
    pub config: Config,
    /// Question batch function.
    pub batch: BatchFunction,
    /// Log table export function.
    pub logs: LogExportFunction,
    /// Interaction recording function.
    pub record: RecordInteractionFunction,
}

impl AppContext {
    /// Wire the HTTP adapters described by `config`.
    ///
    /// Nothing is validated or contacted here: each function checks the
    /// values it needs when it runs.
    pub fn new(config: Config) -> Result<Self> {
        let http_client = HttpClient::from_config(&config.http)?;

        let iam: Arc<dyn IdentityService> =
            Arc::new(IamIdentityService::from_config(http_client.clone(), &config.iam));
        let agent: Arc<dyn AgentService> =
            Arc::new(OrchestrateAgentService::from_config(http_client.clone(), &config.orchestrate));

        let db2_host = config.db2.hostname.clone().unwrap_or_default();
        let db2_identity: Arc<dyn IdentityService> =
            Arc::new(Db2IdentityService::new(http_client.clone(), db2_host.clone()));
        let sql_jobs: Arc<dyn SqlJobService> = Arc::new(Db2SqlJobService::new(
            http_client,
            db2_host,
            config.db2.deployment_id.clone(),
        ));

        Ok(Self::with_services(config, iam, agent, db2_identity, sql_jobs))
    }

    /// Build the context around explicit service implementations.
    pub fn with_services(
        config: Config,
        agent_identity: Arc<dyn IdentityService>,
        agent: Arc<dyn AgentService>,
        sql_identity: Arc<dyn IdentityService>,
        sql_jobs: Arc<dyn SqlJobService>,
    ) -> Self {
        let poller = JobPoller::from_config(sql_jobs, &config.polling);
        debug!(
            concurrency = config.batch.concurrency,
            poll_attempts = poller.max_attempts(),
            poll_interval_ms = u64::try_from(poller.interval().as_millis()).unwrap_or(u64::MAX),
            "application context ready"
        );

        Self {
            batch: BatchFunction::new(agent_identity, agent)
                .with_concurrency(config.batch.concurrency),
            logs: LogExportFunction::new(sql_identity.clone(), poller.clone()),
            record: RecordInteractionFunction::new(sql_identity, poller),
            config,
        }
    }
}
