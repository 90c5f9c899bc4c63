//! logmux-protocol - Control requests for the log manager
//!
//! This crate provides:
//! - [`RequestProcessor`] running `addHandler`, `removeHandler`, and `enumHandlers`
//!   requests against a [`LogManager`](logmux_manager::LogManager)
//! - [`Codec`] trait with the [`JsonCodec`] implementation
//! - [`ProtocolError`] request-level failures

mod codec;
mod error;
mod request;

pub use codec::{Codec, DataFormat, JsonCodec};
pub use error::ProtocolError;
pub use request::{Command, Reply, Request, RequestProcessor};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Codec, Command, DataFormat, JsonCodec, ProtocolError, Reply, Request, RequestProcessor,
    };
}
