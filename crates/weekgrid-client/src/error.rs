//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider error that prevents fetching anything at all.
    #[error("provider error: {0}")]
    Provider(String),

    /// Events file could not be read or decoded.
    #[error("events file {path}: {message}")]
    EventsFile { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<weekgrid_core::ConfigError> for ClientError {
    fn from(err: weekgrid_core::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<weekgrid_providers::ProviderError> for ClientError {
    fn from(err: weekgrid_providers::ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}
