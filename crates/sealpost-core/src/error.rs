//! Error types for `Sealpost` core library.

use thiserror::Error;

/// Result type alias using `Sealpost` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `Sealpost` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracing subscriber could not be installed
    #[error("Tracing initialisation failed: {0}")]
    Tracing(String),
}
