//! Fruitscan Core Library
//!
//! Analysis relay, relay client and report model for fruit disease detection.

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod relay;
pub mod report;

pub use error::{ClientError, ClientResult, ConfigError, ErrorKind, RelayError, RelayResult};
