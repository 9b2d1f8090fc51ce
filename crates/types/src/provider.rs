//! Provider identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a supported QRIS issuing bank integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// BNI QRIS API (password grant, HMAC-signed transactions).
    Bni,
    /// BRI SNAP QR MPM Dynamic API (RSA-signed token, HMAC-signed transactions).
    BriMpmDynamic,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bni => write!(f, "bni"),
            Self::BriMpmDynamic => write!(f, "bri_mpm_dynamic"),
        }
    }
}

impl std::str::FromStr for ProviderId {
    type Err = crate::QrisError;

    /// Parse a provider name or well-known alias into a [`ProviderId`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::QrisError::UnsupportedProvider`] if the string does
    /// not match any known provider name or alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bni" => Ok(Self::Bni),
            "bri_mpm_dynamic" | "bri-mpm-dynamic" | "bri-mpm" | "bri" => Ok(Self::BriMpmDynamic),
            other => Err(crate::QrisError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl ProviderId {
    /// Returns all known provider variants.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Bni, Self::BriMpmDynamic]
    }

    /// Key under which the provider's access token is cached.
    #[must_use]
    pub fn cache_key(self) -> &'static str {
        match self {
            Self::Bni => "bni",
            Self::BriMpmDynamic => "bri_mpm",
        }
    }
}
