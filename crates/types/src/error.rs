//! Unified error type for the qrisgate workspace.

use thiserror::Error;

/// Enumerates all infrastructure failures a gateway operation can report.
///
/// Business outcomes (a bank declining or not yet settling a payment) are
/// never errors; they arrive inside a [`crate::QrisResponse`].
#[derive(Debug, Error)]
pub enum QrisError {
    /// Network, timeout, or response-decoding failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The token endpoint did not hand out an access token.
    #[error("authentication error: {provider}({code}) - {description}")]
    Authentication {
        provider: crate::ProviderId,
        code: String,
        description: String,
    },

    /// Key loading, parsing, or signing failure.
    #[error("signing error: {0}")]
    Signing(String),

    /// A token lifetime that cannot be parsed as whole seconds.
    #[error("malformed cache data: {field}={value:?}")]
    MalformedCacheData { field: &'static str, value: String },

    /// A wire response lacks a field required to interpret it.
    #[error("missing field: {0}")]
    MissingField(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A monetary amount that is not `<digits>.<two digits>`.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The named provider is not known to this build.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "rquest")]
impl From<rquest::Error> for QrisError {
    fn from(e: rquest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl QrisError {
    /// Returns `true` if the error is likely transient and worth retrying.
    ///
    /// Nothing in this workspace retries on its own; this is a hint for callers.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, QrisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_authentication() {
        let err = QrisError::Authentication {
            provider: crate::ProviderId::Bni,
            code: "401".into(),
            description: "invalid_client".into(),
        };
        assert_eq!(
            err.to_string(),
            "authentication error: bni(401) - invalid_client"
        );
    }

    #[test]
    fn test_error_display_malformed_cache_data() {
        let err = QrisError::MalformedCacheData {
            field: "expires_in",
            value: "soon".into(),
        };
        let s = err.to_string();
        assert!(s.contains("expires_in"));
        assert!(s.contains("soon"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid {{{").unwrap_err();
        let err: QrisError = json_err.into();
        assert!(matches!(err, QrisError::Serialization(_)));
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(QrisError::Transport("timed out".into()).is_retryable());
        assert!(!QrisError::Signing("bad key".into()).is_retryable());
        assert!(!QrisError::MissingField("accessToken".into()).is_retryable());
        assert!(!QrisError::Config("no bni section".into()).is_retryable());
    }
}
