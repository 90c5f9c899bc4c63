//! logmux-ffi - C ABI exports for the logging subsystem
//!
//! This crate provides the boundary the platform's C code calls into.
//!
//! # FFI Functions
//!
//! The following functions are exported with C linkage:
//!
//! - `logmux_init` - Create the global manager and route Rust `tracing` into it
//! - `logmux_process_request` - Run a control request in place in a buffer
//! - `logmux_apply_config` - Provision handlers from a JSON configuration
//! - `logmux_log_message` / `logmux_log_write` / `logmux_log_enabled` - Platform logging entry points
//! - `logmux_last_error` - Error code of the last failed call on this thread
//! - `logmux_shutdown` - Destroy all factory handlers

mod exports;
mod panic_guard;

pub use exports::{
    ERROR_INTERNAL, ERROR_INVALID_ARGUMENT, ERROR_NONE, logmux_apply_config, logmux_init,
    logmux_last_error, logmux_log_enabled, logmux_log_message, logmux_log_write,
    logmux_process_request, logmux_shutdown,
};
pub use panic_guard::{catch_panic, install_panic_hook};

// Re-export types callers of the Rust API need
pub use logmux_core::LogLevel;
pub use logmux_protocol::DataFormat;
