//! Error types for the logging facade.

use thiserror::Error;

/// Errors that can occur in the logging facade.
///
/// Logging calls themselves never fail; errors here surface only from
/// flushing, configuration, and sink registration.
#[derive(Debug, Error)]
pub enum LogError {
    /// An unknown level name was supplied to a level-filter configuration.
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// An I/O error occurred while flushing a writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A printer failed to flush.
    #[error("flush failed: {0}")]
    Flush(String),

    /// A sink with the given name is already registered.
    #[error("sink already registered: {0}")]
    SinkExists(String),
}

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, LogError>;
