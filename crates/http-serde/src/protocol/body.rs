//! Request body representation.
//!
//! A body starts life either as a caller supplied [`BodyStream`] (read once, then closed)
//! or as bytes already in memory. Encoding drains a stream into memory exactly once and
//! swaps it for a buffered body, after which the same request can be dumped again and
//! produce the same bytes.

use std::fmt;
use std::io::{self, Read};

use bytes::buf::Reader;
use bytes::{Buf, Bytes};

/// A readable body source owning a resource that must be released explicitly.
///
/// `close` is called exactly once by the encoder after the stream was drained, whether
/// or not the drain succeeded.
pub trait BodyStream: Read + Send {
    fn close(&mut self) -> io::Result<()>;
}

/// Adapts any reader into a [`BodyStream`] whose `close` always succeeds.
#[derive(Debug)]
pub struct NopClose<R> {
    inner: R,
}

impl<R> NopClose<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Read for NopClose<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> BodyStream for NopClose<R> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Body of a [`WireRequest`](crate::protocol::WireRequest).
pub struct ReqBody {
    kind: Kind,
}

enum Kind {
    /// No body at all
    NoBody,
    /// Single use stream, not read yet
    Stream(Box<dyn BodyStream>),
    /// In memory, can be read any number of times
    Buffered(Bytes),
}

impl ReqBody {
    /// The "no body" sentinel.
    pub fn empty() -> Self {
        Self { kind: Kind::NoBody }
    }

    pub fn from_stream<S: BodyStream + 'static>(stream: S) -> Self {
        Self { kind: Kind::Stream(Box::new(stream)) }
    }

    /// Wraps a plain reader, closing it is a no-op.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::from_stream(NopClose::new(reader))
    }

    /// Returns true for the "no body" sentinel. A buffered zero-length body is not absent.
    pub fn is_absent(&self) -> bool {
        matches!(self.kind, Kind::NoBody)
    }

    /// Returns true if the body is in memory and can be read repeatedly.
    pub fn is_buffered(&self) -> bool {
        matches!(self.kind, Kind::NoBody | Kind::Buffered(_))
    }

    /// Byte length when it is known without reading, i.e. for absent or buffered bodies.
    pub fn known_len(&self) -> Option<u64> {
        match &self.kind {
            Kind::NoBody => Some(0),
            Kind::Stream(_) => None,
            Kind::Buffered(bytes) => Some(bytes.len() as u64),
        }
    }

    /// The buffered bytes, `None` for absent bodies and streams that were not drained yet.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.kind {
            Kind::Buffered(bytes) => Some(bytes),
            Kind::NoBody | Kind::Stream(_) => None,
        }
    }

    /// A fresh reader positioned at the start of the body.
    ///
    /// Every call returns an independent reader, so the body can be read in full more
    /// than once. Returns `None` while the body is still an undrained stream.
    pub fn reader(&self) -> Option<Reader<Bytes>> {
        match &self.kind {
            Kind::NoBody => Some(Bytes::new().reader()),
            Kind::Stream(_) => None,
            Kind::Buffered(bytes) => Some(bytes.clone().reader()),
        }
    }

    /// Detaches the stream, leaving the "no body" sentinel in its place.
    ///
    /// Absent and buffered bodies are left untouched and `None` is returned.
    pub(crate) fn take_stream(&mut self) -> Option<Box<dyn BodyStream>> {
        if !matches!(self.kind, Kind::Stream(_)) {
            return None;
        }

        match std::mem::replace(&mut self.kind, Kind::NoBody) {
            Kind::Stream(stream) => Some(stream),
            Kind::NoBody | Kind::Buffered(_) => None,
        }
    }
}

impl Default for ReqBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ReqBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::NoBody => f.write_str("ReqBody::NoBody"),
            Kind::Stream(_) => f.write_str("ReqBody::Stream(..)"),
            Kind::Buffered(bytes) => f.debug_tuple("ReqBody::Buffered").field(bytes).finish(),
        }
    }
}

impl From<Bytes> for ReqBody {
    fn from(bytes: Bytes) -> Self {
        Self { kind: Kind::Buffered(bytes) }
    }
}

impl From<Vec<u8>> for ReqBody {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<String> for ReqBody {
    fn from(str: String) -> Self {
        Bytes::from(str).into()
    }
}

impl From<&'static str> for ReqBody {
    fn from(str: &'static str) -> Self {
        Bytes::from_static(str.as_bytes()).into()
    }
}

impl From<&'static [u8]> for ReqBody {
    fn from(bytes: &'static [u8]) -> Self {
        Bytes::from_static(bytes).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(body: &ReqBody) -> Vec<u8> {
        let mut buf = Vec::new();
        body.reader().unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn buffered_body_is_re_readable() {
        let body = ReqBody::from("test");

        assert!(body.is_buffered());
        assert_eq!(body.known_len(), Some(4));
        assert_eq!(read_all(&body), b"test");
        assert_eq!(read_all(&body), b"test");
    }

    #[test]
    fn absent_body_reads_empty() {
        let body = ReqBody::empty();

        assert!(body.is_absent());
        assert_eq!(body.known_len(), Some(0));
        assert!(body.as_bytes().is_none());
        assert!(read_all(&body).is_empty());
    }

    #[test]
    fn stream_body_has_no_reader_until_drained() {
        let mut body = ReqBody::from_reader(Cursor::new(b"abc".to_vec()));

        assert!(!body.is_buffered());
        assert!(!body.is_absent());
        assert_eq!(body.known_len(), None);
        assert!(body.reader().is_none());

        let mut stream = body.take_stream().unwrap();
        assert!(body.is_absent());

        let mut buf = String::new();
        stream.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "abc");
        assert!(stream.close().is_ok());
    }

    #[test]
    fn take_stream_leaves_buffered_alone() {
        let mut body = ReqBody::from(vec![1, 2, 3]);

        assert!(body.take_stream().is_none());
        assert_eq!(body.as_bytes().map(|b| &b[..]), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn debug_does_not_dump_streams() {
        assert_eq!(format!("{:?}", ReqBody::empty()), "ReqBody::NoBody");
        assert_eq!(format!("{:?}", ReqBody::from_reader(io::empty())), "ReqBody::Stream(..)");
    }
}
