//! Credentials and bearer tokens
//!
//! Neither type prints its secret through `Debug`; both are safe to pass to
//! `tracing` fields by accident.

use std::fmt;

/// Long-lived secret exchanged for a short-lived bearer token.
///
/// `secret` is an API key for the cloud identity service or a password for
/// the SQL service's own token endpoint. `principal` carries the user id
/// when the identity flow needs one; `deployment_id` scopes the request to a
/// tenant or deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
    principal: Option<String>,
    deployment_id: Option<String>,
}

impl Credential {
    /// Credential made of an API key only.
    pub fn api_key(secret: impl Into<String>) -> Self {
        Self { secret: secret.into(), principal: None, deployment_id: None }
    }

    /// Credential made of a user id and password.
    pub fn user_password(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self { secret: password.into(), principal: Some(user.into()), deployment_id: None }
    }

    /// Attach a deployment / tenant identifier.
    #[must_use]
    pub fn with_deployment(mut self, deployment_id: Option<String>) -> Self {
        self.deployment_id = deployment_id.filter(|id| !id.trim().is_empty());
        self
    }

    /// Secret part: API key or password.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// User id for password logins.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Database deployment the token is for.
    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment_id.as_deref()
    }

    /// True when the secret is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.secret.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"<redacted>")
            .field("principal", &self.principal)
            .field("deployment_id", &self.deployment_id)
            .finish()
    }
}

/// Opaque bearer token. One is acquired per run and shared by every request
/// of that run; it is never refreshed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a bearer token.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Token text for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
