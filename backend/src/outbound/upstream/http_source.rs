//! Reqwest-backed upstream source adapter.
//!
//! This adapter owns transport details only: URL construction below the
//! configured base, credential and trace header forwarding, timeouts, and
//! HTTP status and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::dto::UpstreamErrorDto;
use crate::domain::ports::{UpstreamMethod, UpstreamRequest, UpstreamSource, UpstreamSourceError};
use crate::domain::{TRACE_ID_HEADER, TraceId};

const DEFAULT_USER_AGENT: &str = concat!("bluenote-gateway/", env!("CARGO_PKG_VERSION"));

/// Upstream source adapter that issues JSON requests below one base URL.
pub struct UpstreamHttpSource {
    client: Client,
    base: Url,
}

impl UpstreamHttpSource {
    /// Build an adapter with explicit whole-request and connect timeouts.
    ///
    /// ```rust,ignore
    /// let base = Url::parse("http://localhost:8000/v1")?;
    /// let source = UpstreamHttpSource::new(base, Duration::from_secs(10), Duration::from_secs(3))?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, request: &UpstreamRequest) -> Result<Url, UpstreamSourceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                UpstreamSourceError::transport(format!(
                    "upstream base URL {} cannot carry a path",
                    self.base
                ))
            })?
            .pop_if_empty()
            .extend(request.path.split('/').filter(|segment| !segment.is_empty()));
        url.set_query(request.query.as_deref());
        Ok(url)
    }
}

#[async_trait]
impl UpstreamSource for UpstreamHttpSource {
    async fn send(&self, request: UpstreamRequest) -> Result<Value, UpstreamSourceError> {
        let url = self.endpoint(&request)?;
        let mut builder = self
            .client
            .request(method_for(request.method), url)
            .header(ACCEPT, "application/json");
        if let Some(auth) = &request.auth {
            builder = builder.header(AUTHORIZATION, auth.as_header_value());
        }
        if let Some(trace_id) = TraceId::current() {
            builder = builder.header(TRACE_ID_HEADER, trace_id.to_string());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            debug!(
                status = status.as_u16(),
                body = %body_preview(body.as_ref()),
                "upstream returned an error status"
            );
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_body(body.as_ref())
    }
}

fn method_for(method: UpstreamMethod) -> Method {
    match method {
        UpstreamMethod::Get => Method::GET,
        UpstreamMethod::Post => Method::POST,
        UpstreamMethod::Put => Method::PUT,
        UpstreamMethod::Delete => Method::DELETE,
    }
}

fn parse_body(body: &[u8]) -> Result<Value, UpstreamSourceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|error| {
        UpstreamSourceError::decode(format!("invalid upstream JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> UpstreamSourceError {
    if error.is_timeout() {
        UpstreamSourceError::timeout(error.to_string())
    } else {
        UpstreamSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UpstreamSourceError {
    let message = serde_json::from_slice::<UpstreamErrorDto>(body)
        .ok()
        .and_then(UpstreamErrorDto::into_message)
        .unwrap_or_else(|| generic_message(status).to_owned());
    UpstreamSourceError::status(status.as_u16(), message)
}

fn generic_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "Authentication required",
        StatusCode::FORBIDDEN => "Permission denied",
        StatusCode::NOT_FOUND => "Resource not found",
        _ if status.is_client_error() => "Upstream rejected the request",
        _ => "Upstream service error",
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for URL building and status mapping; live exchanges are
    //! exercised by the integration tests against a stub upstream.

    use super::*;
    use rstest::rstest;

    fn source(base: &str) -> UpstreamHttpSource {
        UpstreamHttpSource::new(
            Url::parse(base).expect("base URL"),
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case::no_trailing_slash("http://localhost:8000/v1", "blogs/7", None, "http://localhost:8000/v1/blogs/7")]
    #[case::trailing_slash("http://localhost:8000/v1/", "blogs", Some("page=1&perPage=10"), "http://localhost:8000/v1/blogs?page=1&perPage=10")]
    #[case::root_base("http://localhost:8000", "auth/login", None, "http://localhost:8000/auth/login")]
    fn endpoints_extend_the_base_path(
        #[case] base: &str,
        #[case] path: &str,
        #[case] query: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut request = UpstreamRequest::new(UpstreamMethod::Get, path);
        if let Some(query) = query {
            request = request.with_query(query);
        }
        let url = source(base).endpoint(&request).expect("endpoint builds");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::parsed_detail(StatusCode::NOT_FOUND, br#"{"detail":"Blog not found"}"#.as_slice(), "Blog not found")]
    #[case::generic_not_found(StatusCode::NOT_FOUND, b"".as_slice(), "Resource not found")]
    #[case::generic_forbidden(StatusCode::FORBIDDEN, b"<html>nope</html>".as_slice(), "Permission denied")]
    #[case::generic_client(StatusCode::CONFLICT, b"{}".as_slice(), "Upstream rejected the request")]
    #[case::generic_server(StatusCode::BAD_GATEWAY, b"".as_slice(), "Upstream service error")]
    #[case::parsed_server(StatusCode::INTERNAL_SERVER_ERROR, br#"{"error":"database is down"}"#.as_slice(), "database is down")]
    fn maps_statuses_with_upstream_messages(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, body);
        assert_eq!(error, UpstreamSourceError::status(status.as_u16(), expected));
    }

    #[rstest]
    #[case::empty(b"".as_slice(), Some(Value::Null))]
    #[case::whitespace(b" \n".as_slice(), Some(Value::Null))]
    #[case::object(br#"{"id":1}"#.as_slice(), Some(serde_json::json!({ "id": 1 })))]
    #[case::garbage(b"<html>".as_slice(), None)]
    fn parses_success_bodies(#[case] body: &[u8], #[case] expected: Option<Value>) {
        assert_eq!(parse_body(body).ok(), expected);
    }

    #[test]
    fn previews_are_compacted_and_truncated() {
        let long = "word ".repeat(100);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
        assert_eq!(body_preview(b"  a \n b  "), "a b");
    }

    #[tokio::test]
    async fn refused_connections_are_transport_errors() {
        let result = source("http://127.0.0.1:1/v1")
            .send(UpstreamRequest::new(UpstreamMethod::Get, "blogs"))
            .await;
        let error = result.expect_err("nothing listens on port 1");
        assert!(matches!(error, UpstreamSourceError::Transport { .. }));
        assert!(error.is_unreachable());
    }
}
