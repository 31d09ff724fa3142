//! HTTP transport types and the blocking transport behind `RestAdapter`.
//!
//! # Design
//! Requests and responses are described as plain data. `RestAdapter` builds an
//! `HttpRequest`, hands it to a `Transport`, and classifies the
//! `HttpResponse` it gets back. The transport only moves bytes: it never looks
//! at status codes, so a 404 or a 500 comes back as an ordinary response and
//! only a failure to get any response at all is an error.
//!
//! `UreqTransport` is the production implementation. Tests swap in scripted
//! transports that return canned responses without touching the network.

use std::fmt;
use std::sync::Arc;

use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::error::BoxError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute. `query` pairs are appended by the transport in order.
/// `body` is ignored for GET; `RestAdapter` refuses to build such a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// An HTTP response described as plain data.
///
/// `reason` is the reason phrase for `status` (empty when the status has none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Executes exactly one HTTP request.
///
/// Implementations return `Err` only when no response was obtained. Any
/// status code, including 4xx and 5xx, is an `Ok` response.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// No timeout is configured and nothing is retried.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    /// Build a transport. With `ssl_verify` off, server certificates are
    /// accepted without verification.
    pub fn new(ssl_verify: bool) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(!ssl_verify)
                    .build(),
            )
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(true)
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.query_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let url = request.url.as_str();
        let body = request.body.as_deref();

        let response = match (request.method, body) {
            (HttpMethod::Get, _) => prepare(self.agent.get(url), request).call(),
            (HttpMethod::Post, Some(body)) => prepare(self.agent.post(url), request)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => prepare(self.agent.post(url), request).send_empty(),
            (HttpMethod::Delete, Some(body)) => prepare(self.agent.delete(url), request)
                .force_send_body()
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Delete, None) => prepare(self.agent.delete(url), request).call(),
        };
        let mut response = response?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // link downloads can be far larger than ureq's default read limit
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
