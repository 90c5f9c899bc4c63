//! Error types for logmux

use thiserror::Error;

/// Result type alias for logging operations
pub type LogResult<T> = Result<T, LogError>;

/// Error type for logging configuration and handler management
///
/// None of these are fatal: every failure leaves the logging system in the
/// state it was in before the failed operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// Factory handlers must be identified by a non-empty id
    #[error("handler id must not be empty")]
    EmptyId,

    /// The handler is already in the active set
    #[error("handler is already registered")]
    AlreadyRegistered,

    /// The stream factory could not create the requested stream
    #[error("unsupported stream type: {0}")]
    UnsupportedStream(String),

    /// The handler factory could not create the requested handler
    #[error("unsupported handler type: {0}")]
    UnsupportedHandler(String),

    /// Allocation failed while growing a handler, record, or node list
    #[error("out of memory")]
    OutOfMemory,

    /// Level name not in the level table
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl LogError {
    /// Returns an error code suitable for FFI
    pub fn error_code(&self) -> u32 {
        match self {
            LogError::EmptyId => 1,
            LogError::AlreadyRegistered => 2,
            LogError::UnsupportedStream(_) => 3,
            LogError::UnsupportedHandler(_) => 4,
            LogError::OutOfMemory => 5,
            LogError::UnknownLevel(_) => 6,
            LogError::Config(_) => 7,
        }
    }
}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        LogError::Config(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for LogError {
    fn from(_: std::collections::TryReserveError) -> Self {
        LogError::OutOfMemory
    }
}
