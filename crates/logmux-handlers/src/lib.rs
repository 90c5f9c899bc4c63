//! logmux-handlers - Log handlers, output streams, and factories
//!
//! This crate provides:
//! - [`OutputStream`] and [`SerialPort`] byte sinks, plus the in-memory [`MemoryPort`]
//! - [`LogHandler`] trait with [`StreamLogHandler`] and [`JsonStreamLogHandler`]
//! - [`HandlerFactory`] and [`StreamFactory`] for creating handlers and streams by type name

mod factory;
mod format;
mod handler;
mod stream;

pub use factory::{DefaultHandlerFactory, DefaultStreamFactory, HandlerFactory, StreamFactory};
pub use format::{extract_file_name, extract_func_name};
pub use handler::{JsonStreamLogHandler, LogHandler, StreamLogHandler};
pub use stream::{MemoryPort, OutputStream, SerialPort};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DefaultHandlerFactory, DefaultStreamFactory, HandlerFactory, JsonStreamLogHandler,
        LogHandler, MemoryPort, OutputStream, SerialPort, StreamFactory, StreamLogHandler,
    };
}
