//! HTTP transport shared by every provider client.
//!
//! Banks report business errors as JSON bodies on 4xx statuses, so the body
//! is decoded whatever the status; the status itself is only logged.

use async_trait::async_trait;
use qrisgate_types::{JsonMap, QrisError, Transport, traits::Result};
use rquest::Client;
use serde_json::Value;
use std::time::Duration;

/// `POST` JSON, read JSON, over an [`rquest::Client`].
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Wraps an already configured client.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Builds a client whose every call is cut off after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`QrisError::Transport`] if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform_request(
        &self,
        uri: &str,
        body: &JsonMap,
        headers: &[(String, String)],
    ) -> Result<JsonMap> {
        let mut builder = self.http.post(uri).json(body);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(uri, status = status.as_u16(), "non-success HTTP status");
        }
        let bytes = resp.bytes().await?;
        decode_body(&bytes)
    }
}

/// Decode a response body into a JSON object.
///
/// An empty (or whitespace-only) body and a literal `null` yield an empty map.
///
/// # Errors
///
/// Returns [`QrisError::Transport`] for anything that is not a JSON object.
pub fn decode_body(bytes: &[u8]) -> Result<JsonMap> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonMap::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(JsonMap::new()),
        Ok(other) => Err(QrisError::Transport(format!(
            "expected a JSON object in response body, got: {other}"
        ))),
        Err(e) => Err(QrisError::Transport(format!(
            "undecodable response body: {e}"
        ))),
    }
}
