//! logmux-manager - Log manager and platform dispatch
//!
//! This crate provides:
//! - [`LogManager`] process-wide coordinator of log handlers
//! - [`Platform`] single dispatch registration the manager attaches to
//! - [`PlatformLayer`] tracing layer that forwards `tracing` events to the platform

mod guard;
mod layer;
mod manager;
mod platform;

pub use layer::{PlatformLayer, init_logging};
pub use logmux_core::LogLevel;
pub use manager::LogManager;
pub use platform::{LogDispatch, Platform};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogDispatch, LogLevel, LogManager, Platform, PlatformLayer, init_logging};
}
