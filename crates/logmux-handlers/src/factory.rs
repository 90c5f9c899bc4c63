//! Handler and stream factories

use crate::handler::{JsonStreamLogHandler, LogHandler, StreamLogHandler};
use crate::stream::{OutputStream, SerialPort};
use logmux_core::{CategoryFilter, LogError, LogLevel};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// Creates and destroys log handlers by type name
///
/// Returning `None` means the type is unsupported or construction failed;
/// callers treat both as a configuration error. Factories run with the log
/// manager's lock held and must not call back into the manager.
pub trait HandlerFactory: Send + Sync {
    fn create_handler(
        &self,
        type_name: &str,
        level: LogLevel,
        filters: Vec<CategoryFilter>,
        stream: Option<Arc<dyn OutputStream>>,
        params: &serde_json::Value,
    ) -> Option<Arc<dyn LogHandler>>;

    fn destroy_handler(&self, handler: Arc<dyn LogHandler>) {
        drop(handler);
    }
}

/// Creates and destroys output streams by type name
pub trait StreamFactory: Send + Sync {
    fn create_stream(
        &self,
        type_name: &str,
        params: &serde_json::Value,
    ) -> Option<Arc<dyn OutputStream>>;

    fn destroy_stream(&self, stream: Arc<dyn OutputStream>) {
        drop(stream);
    }
}

/// Factory for the built-in handler types
///
/// - `"StreamLogHandler"`: [`StreamLogHandler`]
/// - `"JSONStreamLogHandler"`: [`JsonStreamLogHandler`]
///
/// Both require an output stream.
#[derive(Debug, Default)]
pub struct DefaultHandlerFactory;

impl DefaultHandlerFactory {
    pub const STREAM_HANDLER: &'static str = "StreamLogHandler";
    pub const JSON_STREAM_HANDLER: &'static str = "JSONStreamLogHandler";

    /// Get the shared factory instance
    pub fn instance() -> Arc<dyn HandlerFactory> {
        static INSTANCE: Lazy<Arc<dyn HandlerFactory>> =
            Lazy::new(|| Arc::new(DefaultHandlerFactory));
        INSTANCE.clone()
    }
}

impl HandlerFactory for DefaultHandlerFactory {
    fn create_handler(
        &self,
        type_name: &str,
        level: LogLevel,
        filters: Vec<CategoryFilter>,
        stream: Option<Arc<dyn OutputStream>>,
        _params: &serde_json::Value,
    ) -> Option<Arc<dyn LogHandler>> {
        match type_name {
            Self::JSON_STREAM_HANDLER => Some(Arc::new(JsonStreamLogHandler::new(
                stream?, level, filters,
            ))),
            Self::STREAM_HANDLER => Some(Arc::new(StreamLogHandler::new(stream?, level, filters))),
            _ => None,
        }
    }
}

/// Factory for the built-in serial stream types
///
/// Ports are supplied by the board at startup through [`register_port`];
/// a type whose port was never registered cannot be created. `Serial1` is a
/// hardware UART and honours the `baud` parameter (default 9600); the USB
/// ports `Serial` and `USBSerial1` have no configurable rate.
///
/// [`register_port`]: DefaultStreamFactory::register_port
#[derive(Default)]
pub struct DefaultStreamFactory {
    ports: RwLock<Vec<(&'static str, Arc<dyn SerialPort>)>>,
}

impl DefaultStreamFactory {
    pub const SERIAL: &'static str = "Serial";
    pub const USB_SERIAL1: &'static str = "USBSerial1";
    pub const SERIAL1: &'static str = "Serial1";

    /// Baud rate used for UART ports when no `baud` parameter is given
    pub const DEFAULT_BAUD: u32 = 9600;

    const TYPES: [&'static str; 3] = [Self::SERIAL, Self::USB_SERIAL1, Self::SERIAL1];

    /// Create a factory with no ports
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the shared factory instance
    pub fn instance() -> Arc<DefaultStreamFactory> {
        static INSTANCE: Lazy<Arc<DefaultStreamFactory>> =
            Lazy::new(|| Arc::new(DefaultStreamFactory::new()));
        INSTANCE.clone()
    }

    /// Attach a port to a built-in stream type, replacing any previous one
    pub fn register_port(&self, type_name: &str, port: Arc<dyn SerialPort>) -> Result<(), LogError> {
        let Some(name) = Self::TYPES.iter().copied().find(|t| *t == type_name) else {
            return Err(LogError::UnsupportedStream(type_name.to_string()));
        };
        let mut ports = self.ports.write();
        ports.retain(|(n, _)| *n != name);
        ports.push((name, port));
        Ok(())
    }

    /// Builder-style variant of [`register_port`](Self::register_port)
    pub fn with_port(self, type_name: &str, port: Arc<dyn SerialPort>) -> Result<Self, LogError> {
        self.register_port(type_name, port)?;
        Ok(self)
    }

    fn port(&self, type_name: &str) -> Option<Arc<dyn SerialPort>> {
        self.ports
            .read()
            .iter()
            .find(|(n, _)| *n == type_name)
            .map(|(_, p)| p.clone())
    }

    fn baud(params: &serde_json::Value) -> u32 {
        params
            .get("baud")
            .and_then(serde_json::Value::as_u64)
            .and_then(|b| u32::try_from(b).ok())
            .unwrap_or(Self::DEFAULT_BAUD)
    }
}

impl StreamFactory for DefaultStreamFactory {
    fn create_stream(
        &self,
        type_name: &str,
        params: &serde_json::Value,
    ) -> Option<Arc<dyn OutputStream>> {
        let port = self.port(type_name)?;
        let baud = match type_name {
            Self::SERIAL1 => Some(Self::baud(params)),
            _ => None,
        };
        port.begin(baud);
        let stream: Arc<dyn OutputStream> = port;
        Some(stream)
    }

    fn destroy_stream(&self, stream: Arc<dyn OutputStream>) {
        let ports = self.ports.read();
        if let Some((_, port)) = ports
            .iter()
            .find(|(_, p)| std::ptr::addr_eq(Arc::as_ptr(p), Arc::as_ptr(&stream)))
        {
            port.end();
        }
    }
}
