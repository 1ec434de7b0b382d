//! Dump HTTP/1.1 requests to their exact wire bytes and parse them back
//!
//! This crate turns an in-memory request into the byte sequence a client would put on
//! the wire, and performs the inverse parse. A request can then be written to a file,
//! pushed through a queue, and replayed later with the same method, target, headers
//! and body.
//!
//! # Features
//!
//! - Byte exact HTTP/1.1 request dumps
//! - Header order and spelling preserved, repeated headers kept apart
//! - Streamed bodies buffered once, then re-readable
//! - `Content-Length` always matching the dumped body
//! - One-shot and incremental (`tokio_util` codec) decoding
//!
//! # Example
//!
//! ```
//! use micro_http_serde::protocol::{ReqBody, WireRequest};
//! use micro_http_serde::{Deserializer, Serializer};
//! use std::io::Cursor;
//!
//! let serde = micro_http_serde::new();
//!
//! let body = ReqBody::from_reader(Cursor::new(b"test".to_vec()));
//! let mut request = WireRequest::post("http://test.test", body).unwrap();
//!
//! let dumped = serde.serialize(Some(&mut request)).unwrap();
//! assert_eq!(&dumped[..], b"POST / HTTP/1.1\r\nHost: test.test\r\nContent-Length: 4\r\n\r\ntest");
//!
//! // the body was buffered, so the same request dumps to the same bytes again
//! assert_eq!(serde.serialize(Some(&mut request)).unwrap(), dumped);
//!
//! let mut replayed = serde.deserialize(&dumped).unwrap();
//! assert_eq!(replayed.host(), "test.test");
//! assert_eq!(serde.serialize(Some(&mut replayed)).unwrap(), dumped);
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: the request entity, header list, body and error types
//! - [`codec`]: encoding and decoding of the wire format
//! - [`Serializer`] / [`Deserializer`]: the high level surface, see [`new`]
//!
//! # Error Handling
//!
//! - [`protocol::SerdeError`]: Top-level error type
//! - [`protocol::EncodeError`]: missing request, body stream failures, unwritable heads
//! - [`protocol::ParseError`]: malformed heads and truncated bodies
//!
//! # Limitations
//!
//! - HTTP/1.1 only
//! - Length framed bodies only, no chunked transfer encoding
//! - Requests only, no responses
//! - A decoded request target is not resolved against any base uri, see
//!   [`protocol::WireRequest::absolute_uri`] before re-issuing it

pub mod codec;
pub mod protocol;

mod serde;
pub use self::serde::{Deserializer, HttpSerde, SerDe, Serializer};

mod utils;
pub(crate) use utils::ensure;

/// Creates the default request serializer / deserializer.
pub fn new() -> HttpSerde {
    HttpSerde::new()
}
