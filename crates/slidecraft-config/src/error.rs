//! Error types for config loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a config file failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// No usable API credentials were provided.
    #[error("need an API key for the model provider (OPENAI_KEY or AZURE_OPENAI_KEY)")]
    MissingCredentials,
    /// An Azure deployment was selected but a companion setting is absent.
    #[error("azure credentials require {0} to be set")]
    IncompleteAzure(&'static str),
    /// An environment variable failed to parse.
    #[error("invalid value for {variable}: {message}")]
    InvalidVar {
        /// Variable name.
        variable: &'static str,
        /// Parse failure detail.
        message: String,
    },
}
