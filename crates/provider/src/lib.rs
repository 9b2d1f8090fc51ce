//! QRIS provider clients.
//!
//! Each provider module implements [`Gateway`] for one bank. [`make_gateway`]
//! builds a boxed client from configuration, and [`make_transport`] the HTTP
//! transport they share.

pub mod bni;
pub mod bri;
pub mod http_util;
pub mod payload;

#[cfg(test)]
mod mock;

pub use bni::BniClient;
pub use bri::BriMpmDynamicClient;
pub use http_util::HttpTransport;
pub use payload::{
    BniCheckStatusRequest, BniGenerateQrRequest, BriMpmCheckStatusRequest, BriMpmGenerateQrRequest,
};

use qrisgate_config::Config;
use qrisgate_types::{Gateway, ProviderId, QrisError, TokenCache, Transport, traits::Result};
use std::{sync::Arc, time::Duration};

/// Create a boxed gateway for `provider` from its configuration section.
///
/// Clients built over the same `cache` share tokens only under the same
/// provider key, so one cache can back every provider.
///
/// # Errors
///
/// Returns [`QrisError::Config`] if the provider's section is missing or
/// invalid.
pub fn make_gateway(
    provider: ProviderId,
    config: &Config,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn TokenCache>,
) -> Result<Box<dyn Gateway>> {
    match provider {
        ProviderId::Bni => {
            let section = config
                .bni
                .clone()
                .ok_or_else(|| not_configured(provider))?;
            Ok(Box::new(BniClient::new(section, transport, cache)))
        }
        ProviderId::BriMpmDynamic => {
            let section = config
                .bri_mpm
                .clone()
                .ok_or_else(|| not_configured(provider))?;
            Ok(Box::new(BriMpmDynamicClient::new(section, transport, cache)?))
        }
    }
}

/// Create the HTTP transport with the configured per-call timeout.
///
/// # Errors
///
/// Returns [`QrisError::Transport`] if the HTTP client cannot be built.
pub fn make_transport(config: &Config) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::with_timeout(Duration::from_secs(config.timeout_secs))?;
    Ok(Arc::new(transport))
}

fn not_configured(provider: ProviderId) -> QrisError {
    QrisError::Config(format!("provider {provider} is not configured"))
}
