//! Error types for CLI operations

use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Key resolution or token verification failed
    #[error(transparent)]
    Decode(#[from] openid_decode::DecodeError),

    /// Configuration could not be loaded or deserialized
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get user-friendly suggestions for resolving the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Decode(err) if err.is_http() => vec![
                "Check --base-url points at the issuer root (e.g. https://host/realms)",
                "Verify the realm name",
                "Increase the timeout with --timeout",
            ],
            Self::Decode(openid_decode::DecodeError::KeyNotFound(_)) => vec![
                "The token may have been issued by a different realm",
                "Keys are fetched once per kid; restart after a key rotation",
            ],
            Self::Config(_) => vec![
                "Check the --config file syntax",
                "Nested environment keys use __, e.g. OPENID_DECODE_HTTP__TIMEOUT_SECS",
            ],
            _ => vec![],
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
