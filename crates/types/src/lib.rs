//! Core types and traits for the qrisgate workspace.
//!
//! This crate defines the shared abstractions used by every provider client:
//! the error taxonomy, provider identifiers, the cached access-token record,
//! monetary amounts, the response normalizer, and the traits each layer
//! implements (gateway, payload, signer, transport, token cache, clock).

pub mod amount;
pub mod error;
pub mod provider;
pub mod response;
pub mod token;
pub mod traits;

pub use amount::Amount;
pub use error::QrisError;
pub use provider::ProviderId;
pub use response::{JsonMap, QrisResponse};
pub use token::AccessToken;
pub use traits::{Clock, Gateway, Payload, Signer, SystemClock, TokenCache, Transport};
