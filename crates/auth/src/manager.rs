//! Access-token lifecycle shared by every provider client.
//!
//! Responsibilities:
//! - Serve tokens from the [`TokenCache`] while they are unexpired.
//! - On a miss, run the provider's token call and cache the result.
//! - Collapse concurrent refreshes for the same key into one call.
//! - Drop a token when the bank reports it as rejected.
use qrisgate_types::{JsonMap, TokenCache, traits::Result};
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
};
use tokio::sync::Mutex as AsyncMutex;

pub struct TokenManager {
    cache: Arc<dyn TokenCache>,
    /// One refresh lock per cache key.
    refresh_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl TokenManager {
    pub fn new(cache: Arc<dyn TokenCache>) -> Self {
        Self {
            cache,
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn TokenCache> {
        &self.cache
    }

    /// Return the cached token for `key`, or obtain a fresh one with `fetch`.
    ///
    /// `fetch` performs the provider's authentication call and returns the raw
    /// token response; the token and its lifetime are read from it and cached.
    /// While one caller is fetching, others asking for the same key wait and
    /// then reuse its result.
    ///
    /// # Errors
    ///
    /// Propagates any error from `fetch`, and returns
    /// [`qrisgate_types::QrisError::MissingField`] or
    /// [`qrisgate_types::QrisError::MalformedCacheData`] if the response
    /// cannot be cached.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock map mutex is poisoned.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<JsonMap>>,
    {
        if let Some(token) = self.cache.get(key) {
            tracing::debug!(key, "access token cache hit");
            return Ok(token);
        }

        let lock = {
            let mut locks = self.refresh_locks.lock().unwrap();
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        let _guard = lock.lock().await;

        if let Some(token) = self.cache.get(key) {
            tracing::debug!(key, "access token refreshed by concurrent caller");
            return Ok(token);
        }

        tracing::debug!(key, "access token cache miss, authenticating");
        let data = fetch().await?;
        let token = self.cache.set_from_response(key, &data)?;
        tracing::info!(key, "access token refreshed");
        Ok(token)
    }

    /// Forget the token for `key` so the next call re-authenticates.
    pub fn invalidate(&self, key: &str) {
        tracing::warn!(key, "access token rejected by provider, invalidating");
        self.cache.invalidate(key);
    }
}
