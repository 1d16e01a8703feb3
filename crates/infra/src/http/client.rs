use std::time::Duration;

use agentprobe_domain::{HttpConfig, ProbeError};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{remote_error, InfraError};

/// HTTP client with a per-request timeout.
///
/// Requests are sent exactly once. Callers own the decision to try again.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ProbeError> {
        Self::builder().build()
    }

    /// Client configured from the `[http]` section.
    pub fn from_config(config: &HttpConfig) -> Result<Self, ProbeError> {
        HttpClientBuilder::from_config(config).build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ProbeError> {
        let request = builder.build().map_err(|err| ProbeError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }

    /// Send the request and decode a successful JSON body.
    ///
    /// A non-success status becomes `ProbeError::Remote` with the start of the
    /// response body; an unreadable body becomes `ProbeError::InvalidResponse`.
    pub async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, ProbeError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        let body = response.bytes().await.map_err(|err| ProbeError::from(InfraError::from(err)))?;
        serde_json::from_slice(&body)
            .map_err(|err| ProbeError::InvalidResponse(format!("response body is not valid JSON: {err}")))
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    no_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: None,
            default_headers: None,
            no_proxy: false,
        }
    }
}

impl HttpClientBuilder {
    /// Builder for the service clients; proxy settings from the environment apply.
    pub fn from_config(config: &HttpConfig) -> Self {
        HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(config.user_agent.clone())
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header; blank sends none.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request.
    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Ignore `HTTP(S)_PROXY` and system proxy settings. Used for clients
    /// that only talk to local mock servers.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, ProbeError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if self.no_proxy {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent.filter(|agent| !agent.trim().is_empty()) {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            ProbeError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}
