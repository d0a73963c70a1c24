//! Configuration schema and loading for Slidecraft.
//!
//! This crate owns the assistant config schema, environment-variable loading,
//! and JSON5 config-file parsing used by the core and the CLI.

mod error;
mod model;

/// Public error type returned by config loading APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::{ApiCredentials, AssistantConfig, AssistantConfigBuilder};
