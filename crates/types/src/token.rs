//! Access token representation and expiry logic.

use crate::{JsonMap, QrisError, error::Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A bearer token together with the absolute instant it stops being usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a record that expires `ttl_secs` seconds after `now`.
    ///
    /// # Errors
    ///
    /// Returns [`QrisError::MalformedCacheData`] if `ttl_secs` is negative or
    /// the expiry instant is not representable.
    pub fn new(token: impl Into<String>, now: DateTime<Utc>, ttl_secs: i64) -> Result<Self> {
        Self::expiring(token, now, "ttl", ttl_secs)
    }

    fn expiring(
        token: impl Into<String>,
        now: DateTime<Utc>,
        field: &'static str,
        ttl_secs: i64,
    ) -> Result<Self> {
        let expires_at = (ttl_secs >= 0)
            .then_some(ttl_secs)
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| QrisError::MalformedCacheData {
                field,
                value: ttl_secs.to_string(),
            })?;
        Ok(Self {
            token: token.into(),
            expires_at,
        })
    }

    /// Return `true` while `now` is strictly before the expiry instant.
    #[must_use]
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Build a record from a token-endpoint response.
    ///
    /// The token is read from `access_token`, falling back to `accessToken`;
    /// the lifetime from `expires_in`, falling back to `expiresIn`. Banks send
    /// the lifetime as a string (`"899"`), integers are accepted as well.
    ///
    /// # Errors
    ///
    /// Returns [`QrisError::MissingField`] if either field is absent under both
    /// names, and [`QrisError::MalformedCacheData`] if the lifetime is not a
    /// whole, non-negative number of seconds within the representable range.
    pub fn from_response(data: &JsonMap, now: DateTime<Utc>) -> Result<Self> {
        let token = ["access_token", "accessToken"]
            .iter()
            .find_map(|k| data.get(*k).and_then(Value::as_str))
            .ok_or_else(|| QrisError::MissingField("access_token or accessToken".into()))?;

        let (field, raw) = ["expires_in", "expiresIn"]
            .iter()
            .find_map(|k| data.get(*k).map(|v| (*k, v)))
            .ok_or_else(|| QrisError::MissingField("expires_in or expiresIn".into()))?;

        let ttl = match raw {
            Value::String(s) => parse_ttl(field, s)?,
            Value::Number(n) => n.as_i64().ok_or_else(|| QrisError::MalformedCacheData {
                field: static_field(field),
                value: n.to_string(),
            })?,
            other => {
                return Err(QrisError::MalformedCacheData {
                    field: static_field(field),
                    value: other.to_string(),
                });
            }
        };

        Self::expiring(token, now, static_field(field), ttl)
    }
}

/// Parse a textual lifetime in seconds.
///
/// # Errors
///
/// Returns [`QrisError::MalformedCacheData`] when `value` is not an integer.
pub fn parse_ttl(field: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| QrisError::MalformedCacheData {
            field: static_field(field),
            value: value.to_string(),
        })
}

fn static_field(field: &str) -> &'static str {
    match field {
        "expires_in" => "expires_in",
        "expiresIn" => "expiresIn",
        _ => "ttl",
    }
}
