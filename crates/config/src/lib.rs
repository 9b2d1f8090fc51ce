//! Configuration loading for qrisgate.
//!
//! Uses figment to merge built-in defaults, an optional YAML file, and
//! `QRISGATE_`-prefixed environment variables into a [`Config`].

pub mod schema;

pub use schema::{BniConfig, BriMpmConfig, Config, LogConfig, LogFormat, PrivateKeySource};
