//! Request head decoder
//!
//! Parses the request line and the header block of a dumped request into a
//! [`WireRequest`] and works out how much body follows.
//!
//! # Stages
//!
//! 1. Request line: method, target and version separated by single spaces. Anything but
//!    `HTTP/1.1` is rejected.
//! 2. Headers: one field per line until the blank line. Values are trimmed of leading
//!    and trailing blanks and repeated names are kept as separate fields. `Host` moves
//!    to [`WireRequest::host`].
//! 3. Payload size: taken from `Content-Length` when it is a plain decimal number,
//!    otherwise no body follows.
//!
//! Tokenizing is done by `httparse`, which also accepts bare `\n` line endings.

use bytes::{Buf, BytesMut};
use http::Method;
use httparse::Status;
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::codec::DecoderConfig;
use crate::ensure;
use crate::protocol::{CONTENT_LENGTH, HOST, HeaderList, ParseError, PayloadSize, WireRequest};

/// Header slots handed to httparse on the first attempt, doubled while the limit allows
const INIT_HEADER_NUM: usize = 32;

/// Decoder for request heads implementing the [`Decoder`] trait.
///
/// Yields the request without a body, together with the size of the body that follows
/// the head in `src`.
#[derive(Debug, Clone, Default)]
pub struct HeaderDecoder {
    config: DecoderConfig,
}

impl HeaderDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }
}

impl Decoder for HeaderDecoder {
    type Item = (WireRequest, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode a request head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((request, payload_size)))` once the blank line was reached, the head
    ///   is removed from `src`
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if the head is malformed or exceeds the configured limits
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let max_headers = self.config.max_headers();
        let max_head_bytes = self.config.max_head_bytes();

        let mut capacity = max_headers.min(INIT_HEADER_NUM);
        let parsed = loop {
            match parse_head(&src[..], capacity) {
                Err(ParseError::TooManyHeaders { .. }) if capacity < max_headers => {
                    capacity = capacity.saturating_mul(2).min(max_headers);
                }
                result => break result?,
            }
        };

        let Some((body_offset, request)) = parsed else {
            ensure!(src.len() <= max_head_bytes, ParseError::too_large_header(src.len(), max_head_bytes));
            return Ok(None);
        };

        ensure!(body_offset <= max_head_bytes, ParseError::too_large_header(body_offset, max_head_bytes));
        src.advance(body_offset);

        let payload_size = parse_payload(request.headers());
        Ok(Some((request, payload_size)))
    }
}

/// Parses a complete head from `src` with room for `capacity` header lines.
///
/// Returns the head size and the request, or `None` when the blank line was not reached.
fn parse_head(src: &[u8], capacity: usize) -> Result<Option<(usize, WireRequest)>, ParseError> {
    let mut headers = vec![httparse::EMPTY_HEADER; capacity];
    let mut req = httparse::Request::new(&mut headers);

    let parsed_result = req.parse(src).map_err(|e| match e {
        httparse::Error::TooManyHeaders => ParseError::too_many_headers(capacity),
        httparse::Error::HeaderName | httparse::Error::HeaderValue => ParseError::invalid_header(e),
        httparse::Error::Version => ParseError::InvalidVersion(None),
        e => ParseError::invalid_request_line(e),
    });

    let body_offset = match parsed_result? {
        Status::Complete(body_offset) => body_offset,
        Status::Partial => return Ok(None),
    };

    trace!(head_size = body_offset, header_count = req.headers.len(), "parsed request head");

    // Only HTTP/1.1 is written by the encoder, so it is the only version read back
    ensure!(req.version == Some(1), ParseError::InvalidVersion(req.version));

    let method = req.method.ok_or_else(|| ParseError::invalid_request_line("missing method"))?;
    let method = Method::from_bytes(method.as_bytes()).map_err(ParseError::invalid_request_line)?;
    let target = req.path.ok_or_else(|| ParseError::invalid_request_line("missing request target"))?.to_string();

    let mut host = None;
    let mut header_list = HeaderList::with_capacity(req.headers.len());
    for header in req.headers.iter() {
        let value = std::str::from_utf8(header.value)
            .map_err(|e| ParseError::invalid_header(format!("value of {} is not utf-8: {e}", header.name)))?;

        if header.name.eq_ignore_ascii_case(HOST) {
            ensure!(host.is_none(), ParseError::DuplicateHost);
            host = Some(value.to_string());
        } else {
            header_list.append(header.name, value);
        }
    }

    let request = WireRequest::from_parts(method, target, host.unwrap_or_default(), header_list);
    Ok(Some((body_offset, request)))
}

/// Determines how much body follows from the first `Content-Length` value.
///
/// A missing value, or one that is not a plain non-negative decimal number, means no
/// body: whatever follows the head is left unread.
fn parse_payload(headers: &HeaderList) -> PayloadSize {
    let Some(cl_value) = headers.get(CONTENT_LENGTH) else {
        return PayloadSize::new_empty();
    };

    let cl_str = cl_value.trim();
    if cl_str.is_empty() || !cl_str.bytes().all(|b| b.is_ascii_digit()) {
        warn!(content_length = cl_value, "ignoring content-length that is not a decimal number");
        return PayloadSize::new_empty();
    }

    match cl_str.parse::<u64>() {
        Ok(length) => PayloadSize::new_length(length),
        Err(e) => {
            warn!(content_length = cl_value, cause = %e, "ignoring content-length that overflows");
            PayloadSize::new_empty()
        }
    }
}
