use crate::ensure;
use crate::protocol::EncodeError;
use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::Encoder;

/// Writes a body whose length was announced in the `Content-Length` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    length: u64,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { length }
    }
}

impl<D: Buf> Encoder<D> for LengthEncoder {
    type Error = EncodeError;

    fn encode(&mut self, mut bytes: D, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let remaining = bytes.remaining() as u64;
        ensure!(remaining <= self.length, EncodeError::io(io::Error::new(io::ErrorKind::InvalidInput, "body longer than content-length")));

        dst.reserve(bytes.remaining());
        while bytes.has_remaining() {
            let chunk = bytes.chunk();
            let len = chunk.len();
            dst.extend_from_slice(chunk);
            bytes.advance(len);
        }

        self.length -= remaining;
        Ok(())
    }
}
