//! Drains a single use body stream so its length is known before the head is written.
//!
//! The normalizer takes ownership of the caller's stream, reads it to the end, closes it
//! and hands a buffered body back to the request. Read and close failures are returned
//! with the stream's own error untouched.

use std::io::Read;

use bytes::Bytes;
use tracing::{error, trace};

use crate::protocol::{BodyStream, EncodeError, ReqBody};

/// Turns any [`ReqBody`] into one whose length is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyNormalizer;

impl BodyNormalizer {
    /// Buffers `body` in place and returns its byte length.
    ///
    /// Absent and already buffered bodies are left unchanged. A stream is replaced by a
    /// buffered body on success. On failure the stream is gone and `body` is left as the
    /// "no body" sentinel.
    pub fn normalize(body: &mut ReqBody) -> Result<u64, EncodeError> {
        let Some(stream) = body.take_stream() else {
            return Ok(body.known_len().unwrap_or(0));
        };

        let buffer = drain(stream)?;
        let length = buffer.len() as u64;
        trace!(body_size = length, "buffered request body");

        *body = ReqBody::from(buffer);
        Ok(length)
    }
}

/// Reads `stream` to the end and closes it, on every path.
fn drain(mut stream: Box<dyn BodyStream>) -> Result<Bytes, EncodeError> {
    let mut buffer = Vec::new();
    let read_result = stream.read_to_end(&mut buffer);
    let close_result = stream.close();

    if let Err(e) = read_result {
        error!(cause = %e, "failed to read request body");
        if let Err(close_error) = close_result {
            error!(cause = %close_error, "failed to close request body after read error");
        }
        return Err(EncodeError::body_read(e));
    }

    if let Err(e) = close_result {
        error!(cause = %e, "failed to close request body");
        return Err(EncodeError::body_close(e));
    }

    Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use std::io;

    mock! {
        Stream {}

        impl io::Read for Stream {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
        }

        impl BodyStream for Stream {
            fn close(&mut self) -> io::Result<()>;
        }
    }

    /// A mocked stream that yields `content` once, then EOF.
    fn stream_of(content: &'static [u8]) -> MockStream {
        let mut stream = MockStream::new();
        let mut sent = false;
        stream.expect_read().returning(move |buf| {
            if sent {
                return Ok(0);
            }
            sent = true;
            buf[..content.len()].copy_from_slice(content);
            Ok(content.len())
        });
        stream
    }

    #[test]
    fn absent_body_is_zero() {
        let mut body = ReqBody::empty();

        assert_eq!(BodyNormalizer::normalize(&mut body).unwrap(), 0);
        assert!(body.is_absent());
    }

    #[test]
    fn buffered_body_is_untouched() {
        let mut body = ReqBody::from("test");

        assert_eq!(BodyNormalizer::normalize(&mut body).unwrap(), 4);
        assert_eq!(BodyNormalizer::normalize(&mut body).unwrap(), 4);
        assert_eq!(body.as_bytes().map(|b| &b[..]), Some(&b"test"[..]));
    }

    #[test]
    fn stream_is_buffered_and_closed() {
        let mut stream = stream_of(b"test");
        stream.expect_close().times(1).returning(|| Ok(()));
        let mut body = ReqBody::from_stream(stream);

        assert_eq!(BodyNormalizer::normalize(&mut body).unwrap(), 4);
        assert!(body.is_buffered());

        let mut first = String::new();
        body.reader().unwrap().read_to_string(&mut first).unwrap();
        let mut second = String::new();
        body.reader().unwrap().read_to_string(&mut second).unwrap();
        assert_eq!(first, "test");
        assert_eq!(second, "test");
    }

    #[test]
    fn empty_stream_is_zero_length() {
        let mut stream = MockStream::new();
        stream.expect_read().returning(|_| Ok(0));
        stream.expect_close().times(1).returning(|| Ok(()));
        let mut body = ReqBody::from_stream(stream);

        assert_eq!(BodyNormalizer::normalize(&mut body).unwrap(), 0);
        assert!(!body.is_absent());
        assert_eq!(body.known_len(), Some(0));
    }

    #[test]
    fn read_error_is_returned_verbatim_and_stream_closed() {
        let mut stream = MockStream::new();
        stream.expect_read().returning(|_| Err(io::Error::other("test")));
        stream.expect_close().times(1).returning(|| Ok(()));
        let mut body = ReqBody::from_stream(stream);

        let err = BodyNormalizer::normalize(&mut body).unwrap_err();
        assert!(matches!(err, EncodeError::BodyRead(_)));
        assert_eq!(err.to_string(), "test");
        assert!(body.is_absent());
    }

    #[test]
    fn read_error_wins_over_close_error() {
        let mut stream = MockStream::new();
        stream.expect_read().returning(|_| Err(io::Error::other("read failed")));
        stream.expect_close().times(1).returning(|| Err(io::Error::other("close failed")));
        let mut body = ReqBody::from_stream(stream);

        let err = BodyNormalizer::normalize(&mut body).unwrap_err();
        assert_eq!(err.to_string(), "read failed");
    }

    #[test]
    fn close_error_after_full_read_fails() {
        let mut stream = stream_of(b"test");
        stream.expect_close().times(1).returning(|| Err(io::Error::other("test")));
        let mut body = ReqBody::from_stream(stream);

        let err = BodyNormalizer::normalize(&mut body).unwrap_err();
        assert!(matches!(err, EncodeError::BodyClose(_)));
        assert_eq!(err.to_string(), "test");
        assert!(body.is_absent());
    }
}
