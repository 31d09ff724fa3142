//! The transport adapter: one HTTP call in, one classified outcome out.
//!
//! # Design
//! `RestAdapter` joins a fixed base URL with the caller's endpoint, sends the
//! request through its `Transport`, and sorts the outcome:
//!
//! - no response at all: `DiscuitError::Transport`
//! - a body that is not JSON (whatever the status): `DiscuitError::Decode`
//! - 2xx: `Ok(ApiResult)` carrying the parsed JSON untouched
//! - anything else: `DiscuitError::Api`, preferring the body's `message`
//!
//! The adapter holds no mutable state. Every call is logged inside the span
//! given at construction.

use serde_json::Value;
use tracing::{debug, error, Span};

use crate::config::ClientConfig;
use crate::error::{DiscuitError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

/// Successful outcome of one adapter call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    pub status_code: u16,
    /// Reason phrase of the response status.
    pub message: String,
    /// Parsed body. A JSON `null` becomes an empty array.
    pub data: Value,
}

/// Issues single HTTP requests against the Discuit API.
#[derive(Debug)]
pub struct RestAdapter<T = UreqTransport> {
    config: ClientConfig,
    base_url: String,
    transport: T,
    span: Span,
}

impl RestAdapter<UreqTransport> {
    /// Adapter backed by a blocking `ureq` agent.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.ssl_verify);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> RestAdapter<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let base_url = config.base_url();
        let span = tracing::debug_span!("discuit", base_url = %base_url);
        if !config.ssl_verify {
            debug!(parent: &span, "certificate verification disabled");
        }
        Self {
            config,
            base_url,
            transport,
            span,
        }
    }

    /// Record every request inside `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<ApiResult> {
        self.request(HttpMethod::Get, endpoint, params, None)
    }

    pub fn post(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResult> {
        self.request(HttpMethod::Post, endpoint, params, body)
    }

    pub fn delete(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResult> {
        self.request(HttpMethod::Delete, endpoint, params, body)
    }

    /// GET an absolute URL and return the raw body. The body is not parsed.
    pub fn fetch_data(&self, url: &str) -> Result<Vec<u8>> {
        let _entered = self.span.enter();
        let request = HttpRequest::get(url);
        debug!(method = %request.method, url, "fetching data");

        let response = self.send(&request)?;
        if !response.is_success() {
            return Err(self.fail(DiscuitError::Api {
                status: response.status,
                message: response.reason,
            }));
        }
        Ok(response.body)
    }

    /// `endpoint` is appended to the base URL verbatim. A body is only
    /// accepted for POST and DELETE.
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResult> {
        let _entered = self.span.enter();
        if method == HttpMethod::Get && body.is_some() {
            return Err(self.fail(DiscuitError::InvalidArgument(
                "GET requests cannot carry a body".to_string(),
            )));
        }
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            query: params.to_vec(),
            // TODO: send the api key once the service documents its auth header.
            headers: Vec::new(),
            body: body.map(Value::to_string),
        };
        debug!(method = %request.method, url = %request.url, params = ?request.query, "sending request");

        let response = self.send(&request)?;
        let data = parse_body(&response.body).map_err(|e| self.fail(e))?;

        if response.is_success() {
            return Ok(ApiResult {
                status_code: response.status,
                message: response.reason,
                data,
            });
        }

        let message = data
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(response.reason);
        Err(self.fail(DiscuitError::Api {
            status: response.status,
            message,
        }))
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.transport.execute(request).map_err(|source| {
            self.fail(DiscuitError::Transport {
                url: request.url.clone(),
                source,
            })
        })
    }

    fn fail(&self, err: DiscuitError) -> DiscuitError {
        error!(error = %err, "request failed");
        err
    }
}

fn parse_body(body: &[u8]) -> Result<Value> {
    match serde_json::from_slice(body) {
        Ok(Value::Null) => Ok(Value::Array(Vec::new())),
        Ok(value) => Ok(value),
        Err(e) => Err(DiscuitError::decode("response body", e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;

    fn adapter(transport: &Arc<ScriptedTransport>) -> RestAdapter<Arc<ScriptedTransport>> {
        RestAdapter::with_transport(ClientConfig::default(), Arc::clone(transport))
    }

    #[test]
    fn success_carries_status_reason_and_data() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, json!({"posts": [], "next": null}));
        let result = adapter(&transport).get("posts", &[]).unwrap();
        assert_eq!(result.status_code, 200);
        assert_eq!(result.message, "OK");
        assert_eq!(result.data, json!({"posts": [], "next": null}));
    }

    #[test]
    fn url_is_base_plus_endpoint_verbatim() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, json!([]));
        transport.push_json(200, json!([]));
        let adapter = adapter(&transport);
        adapter.get("posts", &[]).unwrap();
        adapter.get("/posts", &[]).unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://discuit.net/api/posts");
        assert_eq!(requests[1].url, "https://discuit.net/api//posts");
    }

    #[test]
    fn params_and_body_are_forwarded() {
        let transport = ScriptedTransport::new();
        transport.push_json(201, json!({"id": "x"}));
        let params = vec![("communityID".to_string(), "C1".to_string())];
        let body = json!({"title": "t"});
        let result = adapter(&transport).post("posts", &params, Some(&body)).unwrap();
        assert_eq!(result.status_code, 201);

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.query, params);
        let sent: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn delete_uses_delete_method() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, json!({}));
        adapter(&transport).delete("posts/abc", &[], None).unwrap();
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Delete);
        assert!(request.body.is_none());
    }

    #[test]
    fn non_success_prefers_body_message() {
        let transport = ScriptedTransport::new();
        transport.push_json(403, json!({"status": 403, "message": "Not allowed"}));
        let err = adapter(&transport).get("posts", &[]).unwrap_err();
        match err {
            DiscuitError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Not allowed");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn non_success_without_message_uses_reason() {
        let transport = ScriptedTransport::new();
        transport.push_json(500, json!({"error": true}));
        let err = adapter(&transport).get("posts", &[]).unwrap_err();
        assert!(matches!(
            err,
            DiscuitError::Api { status: 500, ref message } if message == "Internal Server Error"
        ));
    }

    #[test]
    fn empty_body_is_decode_error_for_any_status() {
        let transport = ScriptedTransport::new();
        transport.push_raw(200, b"");
        transport.push_raw(502, b"   ");
        transport.push_raw(404, b"");
        let adapter = adapter(&transport);
        assert!(matches!(adapter.get("posts", &[]), Err(DiscuitError::Decode { .. })));
        assert!(matches!(adapter.get("posts", &[]), Err(DiscuitError::Decode { .. })));
        assert!(matches!(adapter.get("posts/zzz", &[]), Err(DiscuitError::Decode { .. })));
    }

    #[test]
    fn get_with_body_is_rejected_before_sending() {
        let transport = ScriptedTransport::new();
        let body = json!({"title": "t"});
        let err = adapter(&transport)
            .request(HttpMethod::Get, "posts", &[], Some(&body))
            .unwrap_err();
        assert!(matches!(err, DiscuitError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn malformed_json_is_decode_error_for_any_status() {
        let transport = ScriptedTransport::new();
        transport.push_raw(200, b"<html>oops</html>");
        transport.push_raw(502, b"<html>bad gateway</html>");
        let adapter = adapter(&transport);
        assert!(matches!(adapter.get("posts", &[]), Err(DiscuitError::Decode { .. })));
        assert!(matches!(adapter.get("posts", &[]), Err(DiscuitError::Decode { .. })));
    }

    #[test]
    fn null_body_becomes_empty_array() {
        let transport = ScriptedTransport::new();
        transport.push_raw(200, b"null");
        let result = adapter(&transport).get("communities", &[]).unwrap();
        assert_eq!(result.data, json!([]));
    }

    #[test]
    fn transport_failure_is_transport_error() {
        let transport = ScriptedTransport::new();
        transport.push_failure("connection refused");
        let err = adapter(&transport).get("posts", &[]).unwrap_err();
        match err {
            DiscuitError::Transport { url, source } => {
                assert_eq!(url, "https://discuit.net/api/posts");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[test]
    fn fetch_data_returns_raw_bytes() {
        let transport = ScriptedTransport::new();
        transport.push_raw(200, &[0, 159, 146, 150]);
        let bytes = adapter(&transport)
            .fetch_data("https://example.com/cat.png")
            .unwrap();
        assert_eq!(bytes, vec![0, 159, 146, 150]);
        assert_eq!(transport.requests()[0].url, "https://example.com/cat.png");
    }

    #[test]
    fn fetch_data_non_success_is_api_error() {
        let transport = ScriptedTransport::new();
        transport.push_raw(404, b"gone");
        let err = adapter(&transport)
            .fetch_data("https://example.com/cat.png")
            .unwrap_err();
        assert!(matches!(err, DiscuitError::Api { status: 404, .. }));
    }
}
