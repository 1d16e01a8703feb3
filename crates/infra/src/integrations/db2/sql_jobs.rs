use agentprobe_core::SqlJobService;
use agentprobe_domain::constants::{DEPLOYMENT_ID_HEADER, SQL_API_BASE_PATH};
use agentprobe_domain::{
    AccessToken, JobHandle, JobSnapshot, JobStatus, ProbeError, Result, ResultChunk,
    SqlJobRequest,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use super::types::{JobStatusResponse, ResultChunkBody, SubmitJobRequest, SubmitJobResponse};
use crate::http::{service_url, HttpClient};

/// Submits SQL jobs and reads their progress.
#[derive(Clone)]
pub struct Db2SqlJobService {
    http_client: HttpClient,
    hostname: String,
    deployment_id: Option<String>,
}

impl Db2SqlJobService {
    /// Adapter for the database at `hostname`.
    pub fn new(
        http_client: HttpClient,
        hostname: impl Into<String>,
        deployment_id: Option<String>,
    ) -> Self {
        Self {
            http_client,
            hostname: hostname.into(),
            deployment_id: deployment_id.filter(|id| !id.trim().is_empty()),
        }
    }

    fn authorized(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        let builder = builder.bearer_auth(token.as_str());
        match &self.deployment_id {
            Some(deployment_id) => builder.header(DEPLOYMENT_ID_HEADER, deployment_id),
            None => builder,
        }
    }
}

#[async_trait]
impl SqlJobService for Db2SqlJobService {
    async fn submit(&self, token: &AccessToken, request: &SqlJobRequest) -> Result<JobHandle> {
        let url = service_url(&self.hostname, &format!("{SQL_API_BASE_PATH}/sql_jobs"))?;
        let body = SubmitJobRequest {
            commands: &request.commands,
            limit: request.limit,
            separator: &request.separator,
            stop_on_error: if request.stop_on_error { "yes" } else { "no" },
        };

        let builder = self.authorized(self.http_client.request(Method::POST, url), token).json(&body);
        let response: SubmitJobResponse = self.http_client.send_json(builder).await?;

        let id = response
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProbeError::InvalidResponse("job submission returned no id".into()))?;
        debug!(job_id = %id, "SQL job submitted");
        Ok(JobHandle::new(id))
    }

    async fn poll(&self, token: &AccessToken, handle: &JobHandle) -> Result<JobSnapshot> {
        let url = service_url(
            &self.hostname,
            &format!("{SQL_API_BASE_PATH}/sql_jobs/{}", handle.as_str()),
        )?;

        let builder = self.authorized(self.http_client.request(Method::GET, url), token);
        let response: JobStatusResponse = self.http_client.send_json(builder).await?;

        let status = parse_status(&response.status);
        let chunks = response.results.into_iter().map(into_chunk).collect();
        Ok(JobSnapshot::new(status, chunks))
    }
}

fn parse_status(raw: &str) -> JobStatus {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(status = raw, "unrecognized job status; treating as running");
        JobStatus::Running
    })
}

fn into_chunk(body: ResultChunkBody) -> ResultChunk {
    ResultChunk {
        column_names: body.column_names,
        rows: body.rows.unwrap_or_default(),
        error: body.error.and_then(|error| match error {
            Value::Null => None,
            Value::String(message) => Some(message),
            other => Some(other.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn service(server: &MockServer) -> Db2SqlJobService {
        Db2SqlJobService::new(HttpClient::new().unwrap(), server.uri(), Some("crn:v1:dep".into()))
    }

    #[tokio::test]
    async fn submit_sends_commands_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbapi/v4/sql_jobs"))
            .and(header("authorization", "Bearer t-1"))
            .and(header("x-deployment-id", "crn:v1:dep"))
            .and(body_json(json!({
                "commands": "SELECT 1",
                "limit": 10,
                "separator": ";",
                "stop_on_error": "yes"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "job-42"})))
            .expect(1)
            .mount(&server)
            .await;

        let handle = service(&server)
            .submit(&AccessToken::new("t-1"), &SqlJobRequest::new("SELECT 1", 10))
            .await
            .unwrap();

        assert_eq!(handle, JobHandle::new("job-42"));
    }

    #[tokio::test]
    async fn submit_without_id_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = service(&server)
            .submit(&AccessToken::new("t"), &SqlJobRequest::new("SELECT 1", 1))
            .await
            .unwrap_err();

        assert!(matches!(err, ProbeError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn poll_maps_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbapi/v4/sql_jobs/job-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "job-42",
                "status": "running",
                "results": [
                    {"command": "SELECT * FROM T", "columnNames": ["A", "B"], "rows": [[1, 2]]},
                    {"rows": [[3, 4]]},
                    {"error": "SQL0204N"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot =
            service(&server).poll(&AccessToken::new("t"), &JobHandle::new("job-42")).await.unwrap();

        assert_eq!(snapshot.status, JobStatus::Running);
        assert_eq!(snapshot.chunks.len(), 3);
        assert_eq!(snapshot.chunks[0].column_names, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(snapshot.chunks[1].rows, vec![vec![json!(3), json!(4)]]);
        assert_eq!(snapshot.chunks[2].error.as_deref(), Some("SQL0204N"));
    }

    #[tokio::test]
    async fn unknown_status_counts_as_running() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
            .mount(&server)
            .await;

        let snapshot =
            service(&server).poll(&AccessToken::new("t"), &JobHandle::new("j")).await.unwrap();

        assert_eq!(snapshot.status, JobStatus::Running);
        assert!(snapshot.chunks.is_empty());
    }

    #[tokio::test]
    async fn poll_error_status_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("job not found"))
            .mount(&server)
            .await;

        let err =
            service(&server).poll(&AccessToken::new("t"), &JobHandle::new("gone")).await.unwrap_err();

        assert_eq!(err, ProbeError::Remote { status: 404, message: "job not found".into() });
    }
}
