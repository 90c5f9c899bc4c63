//! Per-message log attributes

use serde::Serialize;

/// Optional attributes attached to a log message by the call site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogAttributes {
    /// Timestamp in milliseconds since boot
    pub time: Option<u32>,
    /// Source file path
    pub file: Option<String>,
    /// Source line number
    pub line: Option<u32>,
    /// Function signature, as reported by the compiler
    pub function: Option<String>,
    /// Status or error code
    pub code: Option<i64>,
    /// Free-form details
    pub details: Option<String>,
}

impl LogAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time(mut self, time: u32) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
