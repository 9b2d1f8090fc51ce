//! Scripted stand-in for the bank, used by the client tests.

use async_trait::async_trait;
use qrisgate_types::{JsonMap, QrisError, Transport, traits::Result};
use serde_json::Value;
use std::{collections::VecDeque, sync::Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub uri: String,
    pub body: JsonMap,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<JsonMap>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, value: Value) {
        let Value::Object(map) = value else {
            panic!("mock responses must be JSON objects");
        };
        self.responses.lock().unwrap().push_back(Ok(map));
    }

    pub fn push_err(&self, err: QrisError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform_request(
        &self,
        uri: &str,
        body: &JsonMap,
        headers: &[(String, String)],
    ) -> Result<JsonMap> {
        self.requests.lock().unwrap().push(RecordedRequest {
            uri: uri.to_string(),
            body: body.clone(),
            headers: headers.to_vec(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QrisError::Transport(format!("no response queued for {uri}"))))
    }
}
