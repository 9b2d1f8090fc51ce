//! Authentication primitives for the QRIS provider clients.
//!
//! Signers and canonical messages implement the banks' signature protocols;
//! [`TokenManager`] coordinates the access-token lifecycle on top of a
//! [`qrisgate_types::TokenCache`].

pub mod canonical;
pub mod manager;
pub mod signer;
pub mod timestamp;

pub use manager::TokenManager;
pub use signer::{HmacSha512Signer, RsaSha256Signer, basic_auth};
