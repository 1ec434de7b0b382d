//! Serializer / deserializer surface over the codec.
//!
//! This is the entry point most callers want: build one with [`new`](crate::new), dump
//! requests with [`Serializer::serialize`] and load them back with
//! [`Deserializer::deserialize`].

use bytes::Bytes;

use crate::codec::{self, DecoderConfig};
use crate::protocol::{EncodeError, SerdeError, WireRequest};

/// Dumps a request to its HTTP/1.1 wire bytes.
pub trait Serializer {
    /// Fails with [`EncodeError::NilInput`] when `request` is `None`.
    ///
    /// A streamed body is replaced with a buffered copy, so the same request can be
    /// serialized again and compared byte for byte.
    fn serialize(&self, request: Option<&mut WireRequest>) -> Result<Bytes, SerdeError>;
}

/// Parses a request back from its HTTP/1.1 wire bytes.
pub trait Deserializer {
    fn deserialize(&self, serialized: &[u8]) -> Result<WireRequest, SerdeError>;
}

pub trait SerDe: Serializer + Deserializer {}

impl<T: Serializer + Deserializer> SerDe for T {}

/// The default [`SerDe`] implementation.
///
/// Deserializing applies no head limits unless built with [`HttpSerde::with_config`].
#[derive(Debug, Clone)]
pub struct HttpSerde {
    config: DecoderConfig,
}

impl HttpSerde {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses head limits when deserializing.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }
}

impl Default for HttpSerde {
    fn default() -> Self {
        Self { config: DecoderConfig::unlimited() }
    }
}

impl Serializer for HttpSerde {
    fn serialize(&self, request: Option<&mut WireRequest>) -> Result<Bytes, SerdeError> {
        let request = request.ok_or(EncodeError::NilInput)?;
        Ok(codec::encode(request)?)
    }
}

impl Deserializer for HttpSerde {
    fn deserialize(&self, serialized: &[u8]) -> Result<WireRequest, SerdeError> {
        Ok(codec::decode_with_config(serialized, self.config)?)
    }
}
