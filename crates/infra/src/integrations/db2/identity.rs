use agentprobe_core::IdentityService;
use agentprobe_domain::constants::{DEPLOYMENT_ID_HEADER, SQL_API_BASE_PATH};
use agentprobe_domain::{AccessToken, Credential, ProbeError, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use super::types::{TokenRequest, TokenResponse};
use crate::http::{service_url, HttpClient};

/// Exchanges database user id and password for a bearer token.
#[derive(Clone)]
pub struct Db2IdentityService {
    http_client: HttpClient,
    hostname: String,
}

impl Db2IdentityService {
    /// Adapter for the database at `hostname`.
    pub fn new(http_client: HttpClient, hostname: impl Into<String>) -> Self {
        Self { http_client, hostname: hostname.into() }
    }
}

#[async_trait]
impl IdentityService for Db2IdentityService {
    async fn issue_token(&self, credential: &Credential) -> Result<AccessToken> {
        let userid = credential
            .principal()
            .ok_or_else(|| ProbeError::Config("Missing required environment variables (DB2_USERID)".into()))?;
        let url = service_url(&self.hostname, &format!("{SQL_API_BASE_PATH}/auth/tokens"))?;
        debug!(%url, userid, "requesting database access token");

        let mut request = self
            .http_client
            .request(Method::POST, url)
            .json(&TokenRequest { userid, password: credential.secret() });
        if let Some(deployment_id) = credential.deployment_id() {
            request = request.header(DEPLOYMENT_ID_HEADER, deployment_id);
        }

        let response: TokenResponse = self.http_client.send_json(request).await?;
        response
            .token
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| ProbeError::Auth("token response has no token".into()))
    }
}
