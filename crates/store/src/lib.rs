//! In-memory access-token cache.
//!
//! Holds at most one [`qrisgate_types::AccessToken`] per provider key. There
//! is no persistent backend: tokens live as long as the cache instance.

pub mod clock;
pub mod memory;

pub use clock::ManualClock;
pub use memory::InMemoryTokenCache;
