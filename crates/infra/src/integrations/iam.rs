//! Cloud identity service: API key to bearer token

use agentprobe_core::IdentityService;
use agentprobe_domain::constants::IAM_APIKEY_GRANT_TYPE;
use agentprobe_domain::{AccessToken, Credential, IamConfig, ProbeError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: Option<String>,
}

/// Exchanges an API key for an access token with one form-encoded `POST`.
#[derive(Clone)]
pub struct IamIdentityService {
    http_client: HttpClient,
    token_url: String,
}

impl IamIdentityService {
    /// Adapter posting to `token_url`.
    pub fn new(http_client: HttpClient, token_url: impl Into<String>) -> Self {
        Self { http_client, token_url: token_url.into() }
    }

    /// Adapter for the configured token endpoint.
    pub fn from_config(http_client: HttpClient, config: &IamConfig) -> Self {
        Self::new(http_client, config.token_url.clone())
    }
}

#[async_trait]
impl IdentityService for IamIdentityService {
    async fn issue_token(&self, credential: &Credential) -> Result<AccessToken> {
        debug!(token_url = %self.token_url, "requesting IAM access token");

        let request = self
            .http_client
            .request(Method::POST, &self.token_url)
            .header("Accept", "application/json")
            .form(&[("grant_type", IAM_APIKEY_GRANT_TYPE), ("apikey", credential.secret())]);

        let response: IamTokenResponse = self.http_client.send_json(request).await?;
        response
            .access_token
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| ProbeError::Auth("token response has no access_token".into()))
    }
}
