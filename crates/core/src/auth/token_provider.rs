//! Token acquisition with fail-fast credential checks

use std::sync::Arc;

use agentprobe_domain::{AccessToken, Credential, ProbeError, Result};
use tracing::{info, warn};

use crate::ports::IdentityService;

/// Exchanges a credential for a bearer token through an [`IdentityService`].
///
/// No caching and no retry: every `acquire` call is one outbound request.
#[derive(Clone)]
pub struct TokenProvider {
    identity: Arc<dyn IdentityService>,
}

impl TokenProvider {
    /// Provider backed by `identity`.
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    /// Acquire a token for one run.
    ///
    /// # Errors
    /// - `ProbeError::Config` when the credential's secret is empty; no
    ///   request is sent in that case.
    /// - `ProbeError::Auth` for every other failure (transport, non-success
    ///   status, missing token field).
    pub async fn acquire(&self, credential: &Credential) -> Result<AccessToken> {
        if credential.is_blank() {
            return Err(ProbeError::Config("credential secret is not set".into()));
        }

        info!(principal = credential.principal(), "Requesting access token");

        match self.identity.issue_token(credential).await {
            Ok(token) if token.as_str().trim().is_empty() => {
                warn!("Identity service returned an empty token");
                Err(ProbeError::Auth("identity service returned an empty token".into()))
            }
            Ok(token) => {
                info!("Access token retrieved");
                Ok(token)
            }
            Err(err) => {
                warn!(error = %err, "Access token request failed");
                Err(into_auth_error(err))
            }
        }
    }
}

fn into_auth_error(err: ProbeError) -> ProbeError {
    match err {
        ProbeError::Auth(message) => ProbeError::Auth(message),
        other => ProbeError::Auth(other.to_string()),
    }
}
