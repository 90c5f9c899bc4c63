//! Control request processing

use crate::codec::{Codec, DataFormat, JsonCodec};
use crate::error::ProtocolError;
use logmux_core::HandlerSpec;
use logmux_manager::LogManager;
use serde::Deserialize;

/// Commands understood by the control protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create a factory handler, replacing any handler with the same id
    AddHandler,
    /// Destroy a factory handler; unknown ids are not an error
    RemoveHandler,
    /// List factory handler ids in creation order
    EnumHandlers,
}

impl Command {
    /// Look up a command by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "addHandler" => Some(Command::AddHandler),
            "removeHandler" => Some(Command::RemoveHandler),
            "enumHandlers" => Some(Command::EnumHandlers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::AddHandler => "addHandler",
            Command::RemoveHandler => "removeHandler",
            Command::EnumHandlers => "enumHandlers",
        }
    }
}

/// A decoded control request
///
/// ```json
/// {
///   "cmd": "addHandler",
///   "id": "handler1",
///   "hnd": {"type": "JSONStreamLogHandler", "param": {}},
///   "strm": {"type": "Serial1", "param": {"baud": 115200}},
///   "filt": [{"cat": "app", "lvl": "all"}],
///   "lvl": "warn"
/// }
/// ```
///
/// Handler fields are ignored by commands that do not use them. Unknown
/// fields are ignored; an unknown level name fails the whole request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    /// Command name
    pub cmd: String,

    /// Handler id and settings
    #[serde(flatten)]
    pub handler: HandlerSpec,
}

impl Request {
    /// Resolve the command name
    pub fn command(&self) -> Result<Command, ProtocolError> {
        Command::from_name(&self.cmd).ok_or_else(|| ProtocolError::UnknownCommand(self.cmd.clone()))
    }
}

/// Result of a successfully executed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// No payload; encodes to zero bytes
    Empty,
    /// Handler ids, encoded as an array of strings
    HandlerIds(Vec<String>),
}

/// Runs control requests against a [`LogManager`]
///
/// Requests and replies share one caller-owned buffer: the request occupies
/// the front of the buffer and the reply overwrites it.
pub struct RequestProcessor<'a> {
    manager: &'a LogManager,
}

impl<'a> RequestProcessor<'a> {
    /// Create a processor for a specific manager
    pub fn new(manager: &'a LogManager) -> Self {
        Self { manager }
    }
}

impl RequestProcessor<'static> {
    /// Create a processor for the global manager
    pub fn global() -> Self {
        Self::new(LogManager::instance())
    }
}

impl RequestProcessor<'_> {
    /// Process the request in `buf[..request_size]` and write the reply into `buf`
    ///
    /// Returns the size of the reply. On error the buffer contents are
    /// unspecified.
    pub fn process(
        &self,
        buf: &mut [u8],
        request_size: usize,
        format: DataFormat,
    ) -> Result<usize, ProtocolError> {
        if request_size > buf.len() {
            return Err(ProtocolError::RequestTooLarge {
                size: request_size,
                capacity: buf.len(),
            });
        }
        match format {
            DataFormat::Json => self.process_with(&JsonCodec, buf, request_size),
            other => Err(ProtocolError::UnsupportedFormat(other as u8)),
        }
    }

    fn process_with<C: Codec>(
        &self,
        codec: &C,
        buf: &mut [u8],
        request_size: usize,
    ) -> Result<usize, ProtocolError> {
        let request: Request = codec.decode(&buf[..request_size])?;
        let result = self.execute(&request);
        if let Err(e) = &result {
            tracing::debug!(cmd = %request.cmd, error = %e, "control request failed");
        }
        match result? {
            Reply::Empty => Ok(0),
            Reply::HandlerIds(ids) => codec.encode_into(&ids, buf),
        }
    }

    /// Execute a decoded request
    pub fn execute(&self, request: &Request) -> Result<Reply, ProtocolError> {
        match request.command()? {
            Command::AddHandler => {
                self.manager.add_handler_spec(&request.handler)?;
                Ok(Reply::Empty)
            }
            Command::RemoveHandler => {
                self.manager.remove_factory_handler(&request.handler.id);
                Ok(Reply::Empty)
            }
            Command::EnumHandlers => Ok(Reply::HandlerIds(self.manager.factory_handler_ids())),
        }
    }
}

#[cfg(test)]
#[path = "request/request_tests.rs"]
mod request_tests;
