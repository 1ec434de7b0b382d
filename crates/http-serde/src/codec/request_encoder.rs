//! HTTP request encoder module
//!
//! Dumps a [`WireRequest`] to its HTTP/1.1 wire form: request line, `Host`, the other
//! headers, a blank line and the raw body. The body is buffered first so that
//! `Content-Length` always matches the bytes that follow.

use crate::codec::body::{BodyNormalizer, LengthEncoder};
use crate::codec::header::HeaderEncoder;
use crate::protocol::{CONTENT_LENGTH, EncodeError, WireRequest};
use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;
use tracing::debug;

/// Encoder for dumped requests.
///
/// Encoding replaces a streamed body of the request with a buffered copy and overwrites
/// its `Content-Length`, so encoding the same request twice gives the same bytes.
#[derive(Debug, Default)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encoder<&mut WireRequest> for RequestEncoder {
    type Error = EncodeError;

    fn encode(&mut self, request: &mut WireRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let length = BodyNormalizer::normalize(request.body_mut())?;
        request.headers_mut().set(CONTENT_LENGTH, length.to_string());

        self.header_encoder.encode(&*request, dst)?;

        let body = request.body().as_bytes().cloned().unwrap_or_default();
        let mut payload_encoder = LengthEncoder::new(length);
        payload_encoder.encode(body, dst)?;

        debug!(method = %request.method(), target = request.target(), body_size = length, "encoded request");
        Ok(())
    }
}

/// Drains the body of `request` into memory and returns its byte length.
///
/// See [`BodyNormalizer::normalize`].
pub fn normalize(request: &mut WireRequest) -> Result<u64, EncodeError> {
    BodyNormalizer::normalize(request.body_mut())
}

/// Dumps `request` to wire bytes.
pub fn encode(request: &mut WireRequest) -> Result<Bytes, EncodeError> {
    let mut dst = BytesMut::new();
    RequestEncoder::new().encode(request, &mut dst)?;
    Ok(dst.freeze())
}
