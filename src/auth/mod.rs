//! Caller authentication against the upstream auth service.
//!
//! A bearer token is resolved into a [`CallerIdentity`] by `GET <auth_url>`
//! with the token forwarded. The call is guarded by a [`CircuitBreaker`] so a
//! failing upstream is not hammered and callers fail fast while it recovers.

pub mod circuit_breaker;
pub mod extractor;

use circuit_breaker::{BreakerConfig, BreakerError, BreakerState, CircuitBreaker};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

pub use extractor::CurrentUser;

/// Default client-side timeout for the upstream call.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(5);

/// The authenticated caller as reported by the auth service.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CallerIdentity {
    /// User id.
    pub sub: Uuid,
    /// Role names granted to the user.
    pub role: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The credential is missing, invalid or expired.
    #[error("{0}")]
    Unauthorized(String),
    /// The auth service could not give an answer.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    fn is_upstream_failure(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

/// HTTP client for the auth service, shared by all requests.
#[derive(Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    url: String,
    breaker: CircuitBreaker,
}

impl AuthClient {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        breaker: BreakerConfig,
    ) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            breaker: CircuitBreaker::new(breaker),
        })
    }

    pub fn breaker_state(&self) -> BreakerState {
        self.breaker.state()
    }

    /// Resolve `token` into the caller's identity.
    ///
    /// While the breaker is open this fails with `ServiceUnavailable` without
    /// contacting the upstream.
    pub async fn authenticate(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        match self
            .breaker
            .call(AuthError::is_upstream_failure, self.fetch_identity(token))
            .await
        {
            Ok(identity) => Ok(identity),
            Err(BreakerError::Inner(err)) => Err(err),
            Err(BreakerError::Open) => {
                warn!("auth service circuit is open, rejecting request");
                Err(unavailable())
            }
        }
    }

    async fn fetch_identity(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let response = self
            .http
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "auth service request failed");
                unavailable()
            })?;

        match response.status() {
            StatusCode::OK => response.json::<CallerIdentity>().await.map_err(|err| {
                warn!(error = %err, "auth service returned a malformed identity");
                unavailable()
            }),
            StatusCode::UNAUTHORIZED => Err(AuthError::Unauthorized("session has expired".into())),
            status => {
                warn!(%status, "auth service returned unexpected status");
                Err(unavailable())
            }
        }
    }
}

fn unavailable() -> AuthError {
    AuthError::ServiceUnavailable("authentication service is temporarily unavailable".into())
}
