//! Veil Core — shared error type and environment-driven configuration.

pub mod config;
pub mod error;

pub use config::{EngineConfig, RetentionConfig, VeilConfig};
pub use error::{Error, MismatchReason, Result};
