//! Traits shared across all qrisgate crates.
//!
//! Every cross-crate abstraction is defined here so that higher layers depend
//! only on `qrisgate-types`, not on each other.

use crate::{AccessToken, JsonMap, ProviderId, QrisResponse};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use crate::error::Result;

/// Source of the current time, injectable so token expiry can be simulated.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// In-memory access-token cache keyed by provider cache key.
///
/// A record is returned only while it is unexpired at read time; expired
/// records behave exactly like absent ones.
pub trait TokenCache: Send + Sync {
    /// Return the cached token for `key` if one exists and is unexpired.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `token` under `key` for `ttl` seconds, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QrisError::MalformedCacheData`] if `ttl` is not an
    /// integer number of seconds.
    fn set(&self, key: &str, token: &str, ttl: &str) -> Result<String>;

    /// Store the token carried by a token-endpoint response.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QrisError::MissingField`] if the response lacks the
    /// token or lifetime field, or [`crate::QrisError::MalformedCacheData`] if
    /// the lifetime is unparseable.
    fn set_from_response(&self, key: &str, data: &JsonMap) -> Result<String>;

    /// Store a fully built record.
    fn put(&self, key: &str, token: AccessToken);

    /// Drop the record for `key`, if any.
    fn invalidate(&self, key: &str);
}

/// Produces the provider-mandated signature over a canonical message.
///
/// Implementations must be pure: the same key and message always yield the
/// same signature (RSA PKCS#1 v1.5 is deterministic).
pub trait Signer: Send + Sync {
    /// Sign `message` and return the encoded signature.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QrisError::Signing`] if the key cannot be loaded or
    /// the signing primitive fails.
    fn sign(&self, message: &str) -> Result<String>;
}

/// The "POST JSON, read JSON" primitive every provider call goes through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `uri` with `headers` applied verbatim and decode
    /// the response body as a JSON object (an empty body yields an empty map).
    ///
    /// # Errors
    ///
    /// Returns [`crate::QrisError::Transport`] on network failure, timeout,
    /// or an undecodable response body.
    async fn perform_request(
        &self,
        uri: &str,
        body: &JsonMap,
        headers: &[(String, String)],
    ) -> Result<JsonMap>;
}

/// A typed request that renders itself into a provider's wire schema.
pub trait Payload: Send + Sync {
    /// Render the request as the JSON object the bank expects.
    fn to_wire_map(&self) -> JsonMap;
}

impl Payload for JsonMap {
    fn to_wire_map(&self) -> JsonMap {
        self.clone()
    }
}

/// The common QRIS contract implemented by every provider client.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Which bank this gateway talks to.
    fn provider(&self) -> ProviderId;

    /// Ask the bank to issue a dynamic QR code for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error for authentication, signing or transport failures.
    /// A bank-side rejection is returned as `Ok` and detected with
    /// [`QrisResponse::is_generation_successful`].
    async fn generate_qr_code(&self, request: &dyn Payload) -> Result<QrisResponse>;

    /// Query the payment status of a previously generated QR code.
    ///
    /// # Errors
    ///
    /// Returns an error for authentication, signing or transport failures.
    async fn check_status_transaction(&self, request: &dyn Payload) -> Result<QrisResponse>;
}
