//! Decoder for request bodies framed by the `Content-Length` header.
//!
//! See [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112.html#section-6.2).
//! The whole body is returned as one chunk, since a dumped request keeps its body in
//! memory anyway.

use crate::protocol::ParseError;
use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

/// Reads exactly `length` bytes, waiting until all of them are buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The number of body bytes announced by the Content-Length header
    length: u64,
}

impl LengthDecoder {
    pub fn new(length: u64) -> Self {
        Self { length }
    }

    pub fn length(&self) -> u64 {
        self.length
    }
}

impl Decoder for LengthDecoder {
    type Item = Bytes;
    type Error = ParseError;

    /// Returns the body once `length` bytes are available, leaving anything after it in `src`.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if (src.len() as u64) < self.length {
            trace!(expected = self.length, available = src.len(), "body not complete yet");
            return Ok(None);
        }

        // length <= src.len() here, so it fits in usize
        let Ok(len) = usize::try_from(self.length) else {
            return Err(ParseError::truncated_body(self.length, src.len()));
        };
        Ok(Some(src.split_to(len).freeze()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(body) => Ok(Some(body)),
            None => Err(ParseError::truncated_body(self.length, src.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut buffer: BytesMut = BytesMut::from(&b"101234567890abcdef\r\n\r\n"[..]);

        let mut length_decoder = LengthDecoder::new(10);
        let body = length_decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(&body[..], b"1012345678");
        assert_eq!(&buffer[..], b"90abcdef\r\n\r\n");
    }

    #[test]
    fn waits_for_more() {
        let mut buffer = BytesMut::from(&b"tes"[..]);
        let mut length_decoder = LengthDecoder::new(4);

        assert!(length_decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(buffer.len(), 3);

        buffer.extend_from_slice(b"t");
        assert_eq!(&length_decoder.decode(&mut buffer).unwrap().unwrap()[..], b"test");
        assert!(buffer.is_empty());
    }

    #[test]
    fn zero_length() {
        let mut buffer = BytesMut::from(&b"rest"[..]);

        let body = LengthDecoder::new(0).decode(&mut buffer).unwrap().unwrap();
        assert!(body.is_empty());
        assert_eq!(&buffer[..], b"rest");
    }

    #[test]
    fn truncated_at_eof() {
        let mut buffer = BytesMut::from(&b"te"[..]);

        let err = LengthDecoder::new(4).decode_eof(&mut buffer).unwrap_err();
        assert!(matches!(err, ParseError::TruncatedBody { expected: 4, actual: 2 }));
    }
}
