//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::BoxError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays queued outcomes in order and records every request it sees.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push_raw(status, body.to_string().as_bytes());
    }

    pub(crate) fn push_raw(&self, status: u16, body: &[u8]) {
        let reason = ureq::http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default();
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            reason: reason.to_string(),
            headers: Vec::new(),
            body: body.to_vec(),
        }));
    }

    pub(crate) fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err("no scripted response left".into()),
        }
    }
}
