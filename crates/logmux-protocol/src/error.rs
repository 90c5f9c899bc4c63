//! Protocol errors

use logmux_core::LogError;
use thiserror::Error;

/// Errors that can occur while processing a control request
///
/// Every variant is a request-level failure: the reply buffer contents are
/// unspecified and the reply size must not be trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The request is not well-formed or has a field of the wrong shape
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The declared request size exceeds the buffer
    #[error("request size {size} exceeds buffer capacity {capacity}")]
    RequestTooLarge { size: usize, capacity: usize },

    /// The encoded reply does not fit in the buffer
    #[error("reply size {size} exceeds buffer capacity {capacity}")]
    ReplyTooLarge { size: usize, capacity: usize },

    #[error("unsupported data format: {0}")]
    UnsupportedFormat(u8),

    /// The log manager rejected the command
    #[error(transparent)]
    Manager(#[from] LogError),
}

impl ProtocolError {
    /// Returns an error code suitable for FFI
    ///
    /// Manager errors keep the code of the underlying [`LogError`].
    pub fn error_code(&self) -> u32 {
        match self {
            ProtocolError::Manager(err) => err.error_code(),
            ProtocolError::Malformed(_) => 10,
            ProtocolError::UnknownCommand(_) => 11,
            ProtocolError::RequestTooLarge { .. } => 12,
            ProtocolError::ReplyTooLarge { .. } => 13,
            ProtocolError::UnsupportedFormat(_) => 14,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Malformed(err.to_string())
    }
}
