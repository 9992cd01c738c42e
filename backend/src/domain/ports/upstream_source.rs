//! Driven port for calling the upstream content service.
//!
//! The gateway describes each call as an [`UpstreamRequest`]: a method, a
//! path below the configured base URL, an optional query string and JSON
//! body, and the caller's credentials. Adapters own transport, timeouts and
//! status decoding.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::AuthToken;

/// HTTP verbs the gateway issues upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMethod {
    /// Read.
    Get,
    /// Create, or the login call.
    Post,
    /// Update.
    Put,
    /// Delete.
    Delete,
}

/// One upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// Verb.
    pub method: UpstreamMethod,
    /// Path segments joined by `/`, relative to the upstream base URL.
    pub path: String,
    /// Encoded query string without the leading `?`.
    pub query: Option<String>,
    /// JSON body.
    pub body: Option<Value>,
    /// Caller credentials forwarded as the `Authorization` header.
    pub auth: Option<AuthToken>,
}

impl UpstreamRequest {
    /// Start a request for `path` with no query, body or credentials.
    #[must_use]
    pub fn new(method: UpstreamMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            auth: None,
        }
    }

    /// Attach an encoded query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Forward the caller's credentials, if any.
    #[must_use]
    pub fn with_auth(mut self, auth: Option<&AuthToken>) -> Self {
        self.auth = auth.cloned();
        self
    }
}

define_port_error! {
    /// Errors surfaced while calling the upstream service.
    pub enum UpstreamSourceError {
        /// Connecting or exchanging bytes failed.
        Transport { message: String } =>
            "upstream transport failed: {message}",
        /// No response within the configured timeout.
        Timeout { message: String } =>
            "upstream timed out: {message}",
        /// Upstream answered with a non-2xx status. `message` is taken from
        /// the error body when it has one.
        Status { status: u16, message: String } =>
            "upstream returned status {status}: {message}",
        /// A 2xx body was not valid JSON.
        Decode { message: String } =>
            "upstream response decode failed: {message}",
    }
}

impl UpstreamSourceError {
    /// Whether the failure means upstream is unreachable or broken, as
    /// opposed to having answered the request.
    ///
    /// Network failures, timeouts and 5xx statuses qualify.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode { .. } => false,
        }
    }
}

/// Port for sending requests to the upstream service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// Send one request and return the decoded JSON body.
    ///
    /// Empty 2xx bodies decode to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamSourceError`] for transport failures, timeouts,
    /// non-2xx statuses and undecodable bodies.
    async fn send(&self, request: UpstreamRequest) -> Result<Value, UpstreamSourceError>;
}

/// Fixture implementation for a gateway with no upstream configured.
///
/// Every call fails as a transport error, so reads are served from the
/// fallback dataset and writes report the upstream as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUpstreamSource;

#[async_trait]
impl UpstreamSource for FixtureUpstreamSource {
    async fn send(&self, _request: UpstreamRequest) -> Result<Value, UpstreamSourceError> {
        Err(UpstreamSourceError::transport("no upstream configured"))
    }
}
