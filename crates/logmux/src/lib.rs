//! # logmux
//!
//! Category-filtered logging with handlers and output streams that can be
//! reconfigured at runtime.
//!
//! logmux routes every log call through a single platform dispatch into a
//! process-wide [`LogManager`], which fans the message out to its handlers.
//! Each handler resolves a threshold for the message's dot-separated category
//! (`app.net.tcp` inherits from `app.net`, then `app`) and writes the
//! messages that pass to its stream.
//!
//! ## Quick Start
//!
//! ```
//! use logmux::prelude::*;
//! use std::sync::Arc;
//!
//! // Ports are supplied by the board; an in-memory one stands in here
//! let port = Arc::new(MemoryPort::new());
//! DefaultStreamFactory::instance().register_port("Serial", port.clone())?;
//!
//! let config = LoggingConfig::from_json(br#"{"handlers": [{
//!     "id": "usb",
//!     "hnd": {"type": "StreamLogHandler"},
//!     "strm": {"type": "Serial"},
//!     "filt": [{"cat": "app.net", "lvl": "trace"}],
//!     "lvl": "info"
//! }]}"#)?;
//! LogManager::instance().apply_config(&config)?;
//!
//! let platform = Platform::global();
//! platform.log_message("booted", LogLevel::Info, Some("app"), &LogAttributes::new());
//! platform.log_message("dropped", LogLevel::Trace, Some("app"), &LogAttributes::new());
//! platform.log_message("syn sent", LogLevel::Trace, Some("app.net.tcp"), &LogAttributes::new());
//!
//! assert_eq!(port.text(), "[app] INFO: booted\r\n[app.net.tcp] TRACE: syn sent\r\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`logmux_core`] - Levels, category filters, attributes, configuration
//! - [`logmux_handlers`] - Handlers, streams, and their factories
//! - [`logmux_manager`] - The log manager, platform dispatch, and tracing bridge
//! - [`logmux_protocol`] - JSON control requests
//! - [`logmux_ffi`] - C ABI exports

// Re-export core types
pub use logmux_core::{
    CategoryFilter, CategoryFilterTree, HandlerSpec, LogAttributes, LogError, LogLevel,
    LogResult, LoggingConfig, ObjectSpec,
};

// Re-export handlers and factories
pub use logmux_handlers::{
    DefaultHandlerFactory, DefaultStreamFactory, HandlerFactory, JsonStreamLogHandler, LogHandler,
    MemoryPort, OutputStream, SerialPort, StreamFactory, StreamLogHandler,
};

// Re-export the manager
pub use logmux_manager::{LogDispatch, LogManager, Platform, PlatformLayer, init_logging};

// Re-export the control protocol
pub use logmux_protocol::{DataFormat, ProtocolError, RequestProcessor};

// Re-export common dependencies that integrators need
pub use serde_json;
pub use tracing;

/// FFI function exports for the platform's C code.
///
/// Add `pub use logmux::ffi_exports::*;` to the shared library's lib.rs to
/// expose the C functions.
pub mod ffi_exports {
    pub use logmux_ffi::{
        logmux_apply_config, logmux_init, logmux_last_error, logmux_log_enabled,
        logmux_log_message, logmux_log_write, logmux_process_request, logmux_shutdown,
    };
}

/// Prelude module for convenient imports.
///
/// Use `use logmux::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        CategoryFilter, DefaultHandlerFactory, DefaultStreamFactory, HandlerFactory, HandlerSpec,
        LogAttributes, LogError, LogHandler, LogLevel, LogManager, LogResult, LoggingConfig,
        MemoryPort, ObjectSpec, OutputStream, Platform, SerialPort, StreamFactory, init_logging,
    };
}
