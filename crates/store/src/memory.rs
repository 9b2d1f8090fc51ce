//! In-memory token cache backed by a `HashMap` behind a `Mutex`.

use qrisgate_types::{
    AccessToken, Clock, JsonMap, SystemClock, TokenCache, token::parse_ttl, traits::Result,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An in-memory [`TokenCache`] keyed by provider cache key.
pub struct InMemoryTokenCache {
    /// Key-indexed token records.
    data: Mutex<HashMap<String, AccessToken>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTokenCache {
    /// Creates a new empty cache reading the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a new empty cache reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache for InMemoryTokenCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let data = self.data.lock().unwrap();
        let record = data.get(key)?;
        if record.is_usable_at(now) {
            Some(record.token.clone())
        } else {
            tracing::debug!(key, expired_at = %record.expires_at, "cached token expired");
            None
        }
    }

    fn set(&self, key: &str, token: &str, ttl: &str) -> Result<String> {
        let ttl = parse_ttl("ttl", ttl)?;
        self.put(key, AccessToken::new(token, self.clock.now(), ttl)?);
        Ok(token.to_string())
    }

    fn set_from_response(&self, key: &str, data: &JsonMap) -> Result<String> {
        let record = AccessToken::from_response(data, self.clock.now())?;
        let token = record.token.clone();
        self.put(key, record);
        Ok(token)
    }

    fn put(&self, key: &str, token: AccessToken) {
        self.data.lock().unwrap().insert(key.to_string(), token);
    }

    fn invalidate(&self, key: &str) {
        self.data.lock().unwrap().remove(key);
    }
}
