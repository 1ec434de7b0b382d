//! HTTP request decoder module
//!
//! Decodes dumped requests either one-shot from a complete byte slice ([`decode`]) or
//! incrementally from a growing buffer through the [`Decoder`] trait, e.g. with
//! `FramedRead` over a file holding several dumps back to back.
//!
//! # Example
//!
//! ```
//! use micro_http_serde::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("POST / HTTP/1.1\r\nHost: test.test\r\nContent-Length: 4\r\n\r\nte");
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"st");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(&request.body().as_bytes().unwrap()[..], b"test");
//! ```

use crate::codec::DecoderConfig;
use crate::codec::body::LengthDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{ParseError, PayloadSize, WireRequest};
use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{error, trace};

/// A decoder for dumped requests that handles both the head and the body
///
/// # State Machine
///
/// - `Head`: parsing the request line and headers with [`HeaderDecoder`]
/// - `Body`: head done, waiting for `Content-Length` bytes with [`LengthDecoder`]
///
/// A head without a usable `Content-Length` yields the request right away with no
/// body, and the decoder goes back to `Head`.
#[derive(Debug, Default)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Head,
    Body {
        request: WireRequest,
        decoder: LengthDecoder,
    },
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { header_decoder: HeaderDecoder::new(config), state: State::Head }
    }
}

impl Decoder for RequestDecoder {
    type Item = WireRequest;
    type Error = ParseError;

    /// Attempts to decode a whole request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: head and body are complete, both removed from `src`
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: malformed head
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let (mut request, mut decoder) = match std::mem::take(&mut self.state) {
            State::Head => match self.header_decoder.decode(src)? {
                Some((request, PayloadSize::Length(length))) => (request, LengthDecoder::new(length)),
                Some((request, PayloadSize::Empty)) => return Ok(Some(request)),
                None => return Ok(None),
            },
            State::Body { request, decoder } => (request, decoder),
        };

        match decoder.decode(src)? {
            Some(body) => {
                trace!(body_size = body.len(), "decoded request body");
                request.set_body(body);
                Ok(Some(request))
            }
            None => {
                self.state = State::Body { request, decoder };
                Ok(None)
            }
        }
    }

    /// Like [`decode`](Decoder::decode), but no more data will arrive.
    ///
    /// An incomplete head is malformed and a short body is truncated. An empty buffer
    /// between requests is a clean end.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        match std::mem::take(&mut self.state) {
            State::Body { decoder, .. } => {
                error!(expected = decoder.length(), actual = src.len(), "request body truncated");
                Err(ParseError::truncated_body(decoder.length(), src.len()))
            }
            State::Head if src.is_empty() => Ok(None),
            State::Head if src.windows(2).any(|w| w == b"\r\n") => {
                Err(ParseError::invalid_header("header block is not terminated by a blank line"))
            }
            State::Head => Err(ParseError::invalid_request_line("request line is not terminated")),
        }
    }
}

/// Decodes one request from a complete dump.
///
/// The body is exactly `Content-Length` bytes. Without a usable `Content-Length` the
/// body is empty, and bytes following the head are ignored, as are bytes after a
/// length-framed body. No head limits apply, the dump is already in memory.
pub fn decode(serialized: &[u8]) -> Result<WireRequest, ParseError> {
    decode_with_config(serialized, DecoderConfig::unlimited())
}

/// [`decode`] with head limits.
pub fn decode_with_config(serialized: &[u8], config: DecoderConfig) -> Result<WireRequest, ParseError> {
    let mut src = BytesMut::from(serialized);
    let mut decoder = RequestDecoder::with_config(config);

    match decoder.decode_eof(&mut src)? {
        Some(request) => {
            if !src.is_empty() {
                trace!(ignored = src.len(), "ignoring bytes after the request");
            }
            Ok(request)
        }
        None => Err(ParseError::invalid_request_line("empty input")),
    }
}
