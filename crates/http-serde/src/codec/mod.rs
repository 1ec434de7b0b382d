//! HTTP codec module for dumping requests to bytes and parsing them back
//!
//! # Architecture
//!
//! - Encoding:
//!   - [`RequestEncoder`]: buffers the body, sets `Content-Length`, writes the request
//!   - Head writing via the [`header`] module
//!   - Body buffering and length framing via the [`body`] module
//!
//! - Decoding:
//!   - [`RequestDecoder`]: head first, then exactly `Content-Length` body bytes
//!   - Limits via [`DecoderConfig`]
//!
//! Both implement the `tokio_util` codec traits, so they also work with `FramedRead`
//! and `FramedWrite`. The free functions [`encode`] and [`decode`] cover the common
//! one-shot case.
//!
//! # Example
//!
//! ```
//! use micro_http_serde::codec;
//! use micro_http_serde::protocol::WireRequest;
//!
//! let mut request = WireRequest::post("http://test.test", "test").unwrap();
//! let bytes = codec::encode(&mut request).unwrap();
//! assert_eq!(&bytes[..], b"POST / HTTP/1.1\r\nHost: test.test\r\nContent-Length: 4\r\n\r\ntest");
//!
//! let decoded = codec::decode(&bytes).unwrap();
//! assert_eq!(decoded.host(), "test.test");
//! ```

pub mod body;
pub mod header;

mod config;
mod request_decoder;
mod request_encoder;

pub use config::{DEFAULT_MAX_HEAD_BYTES, DEFAULT_MAX_HEADERS, DecoderConfig};
pub use request_decoder::{RequestDecoder, decode, decode_with_config};
pub use request_encoder::{RequestEncoder, encode, normalize};
