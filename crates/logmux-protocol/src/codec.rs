//! Data formats and the JSON codec

use crate::error::ProtocolError;
use serde::{Serialize, de::DeserializeOwned};

/// Encoding of a control request and its reply
///
/// Numeric values are the platform's data format codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Binary = 0,
    Text = 1,
    Json = 2,
    Protobuf = 3,
}

impl DataFormat {
    /// Convert from a platform format code
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DataFormat::Binary),
            1 => Some(DataFormat::Text),
            2 => Some(DataFormat::Json),
            3 => Some(DataFormat::Protobuf),
            _ => None,
        }
    }
}

/// Trait for request decoding and reply encoding
pub trait Codec: Send + Sync {
    /// Decode a request from bytes
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Encode a reply into `buf`, returning the number of bytes written
    ///
    /// Fails with [`ProtocolError::ReplyTooLarge`] if the reply does not fit;
    /// `buf` may be partially overwritten in that case.
    fn encode_into<T: Serialize>(&self, value: &T, buf: &mut [u8]) -> Result<usize, ProtocolError>;

    /// Get the data format handled by this codec
    fn format(&self) -> DataFormat;
}

/// JSON codec implementation using serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(Into::into)
    }

    fn encode_into<T: Serialize>(&self, value: &T, buf: &mut [u8]) -> Result<usize, ProtocolError> {
        let encoded = serde_json::to_vec(value)?;
        let Some(dest) = buf.get_mut(..encoded.len()) else {
            return Err(ProtocolError::ReplyTooLarge {
                size: encoded.len(),
                capacity: buf.len(),
            });
        };
        dest.copy_from_slice(&encoded);
        Ok(encoded.len())
    }

    fn format(&self) -> DataFormat {
        DataFormat::Json
    }
}
