//! Handler configuration types

use crate::{CategoryFilter, LogLevel};
use serde::{Deserialize, Serialize};

/// Type name plus free-form parameters for a handler or stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    /// Type name understood by the corresponding factory
    #[serde(rename = "type", default)]
    pub type_name: String,

    /// Additional construction parameters
    #[serde(default, alias = "params")]
    pub param: serde_json::Value,
}

impl ObjectSpec {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            param: serde_json::Value::Null,
        }
    }

    pub fn with_param(mut self, param: serde_json::Value) -> Self {
        self.param = param;
        self
    }
}

/// Description of one factory-created handler
///
/// Field names match the control protocol's `addHandler` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerSpec {
    /// Handler id, unique among factory handlers
    #[serde(default)]
    pub id: String,

    /// Handler type and parameters
    #[serde(rename = "hnd", default)]
    pub handler: ObjectSpec,

    /// Output stream type and parameters; the handler gets no stream if absent
    #[serde(rename = "strm", default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<ObjectSpec>,

    /// Category filters
    #[serde(rename = "filt", default)]
    pub filters: Vec<CategoryFilter>,

    /// Default level for categories without a matching filter
    #[serde(rename = "lvl", default)]
    pub level: LogLevel,
}

impl HandlerSpec {
    pub fn new(id: impl Into<String>, handler: ObjectSpec) -> Self {
        Self {
            id: id.into(),
            handler,
            ..Default::default()
        }
    }

    pub fn with_stream(mut self, stream: ObjectSpec) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, category: impl Into<String>, level: LogLevel) -> Self {
        self.filters.push(CategoryFilter::new(category, level));
        self
    }
}

/// Logging configuration applied at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Handlers to provision, in dispatch order
    #[serde(default)]
    pub handlers: Vec<HandlerSpec>,
}

impl LoggingConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    pub fn with_handler(mut self, handler: HandlerSpec) -> Self {
        self.handlers.push(handler);
        self
    }
}
