//! Request head encoder
//!
//! Writes the request line, the `Host` header and the remaining headers of a
//! [`WireRequest`] followed by the blank line. The caller is responsible for having set
//! `Content-Length` beforehand.
//!
//! Everything written here must parse back to the same request, so:
//!
//! - the target and header names are checked against what the decoder accepts
//! - CR and LF inside values become spaces, and values are trimmed of surrounding blanks
//! - `Host` fields in the header list never produce a second `Host` line

use crate::ensure;
use crate::protocol::{EncodeError, HOST, WireRequest};

use bytes::{BufMut, BytesMut};

use std::borrow::Cow;
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::trace;

/// Initial buffer size allocated for head serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for request heads implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<&WireRequest> for HeaderEncoder {
    type Error = EncodeError;

    /// Encodes the request head into the provided bytes buffer.
    ///
    /// # Output
    ///
    /// ```text
    /// <method> <target> HTTP/1.1\r\n
    /// Host: <host>\r\n            (skipped when the host is empty)
    /// <Name>: <value>\r\n         (one line per value, insertion order)
    /// \r\n
    /// ```
    ///
    /// When the host is empty, the first `Host` field of the header list is used
    /// instead. On error `dst` is left as it was.
    fn encode(&mut self, request: &WireRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let start = dst.len();
        let result = write_head(request, dst);
        if result.is_err() {
            dst.truncate(start);
        }
        result
    }
}

fn write_head(request: &WireRequest, dst: &mut BytesMut) -> Result<(), EncodeError> {
    check_target(request.target())?;

    dst.reserve(INIT_HEADER_SIZE);
    write!(FastWrite(dst), "{} {} HTTP/1.1\r\n", request.method(), request.target())?;

    let host = match request.host() {
        "" => request.headers().get(HOST).unwrap_or_default(),
        host => host,
    };
    let host = clean_value(HOST, host)?;
    if !host.is_empty() {
        put_header(dst, HOST, &host);
    }

    for field in request.headers() {
        if field.name().eq_ignore_ascii_case(HOST) {
            trace!(value = field.value(), "Host field of the header list is not written as a header");
            continue;
        }
        check_name(field.name())?;
        put_header(dst, field.name(), &clean_value(field.name(), field.value())?);
    }
    dst.put_slice(b"\r\n");
    Ok(())
}

#[inline]
fn put_header(dst: &mut BytesMut, name: &str, value: &str) {
    dst.put_slice(name.as_bytes());
    dst.put_slice(b": ");
    dst.put_slice(value.as_bytes());
    dst.put_slice(b"\r\n");
}

/// The target must be a single non-empty token of visible characters.
fn check_target(target: &str) -> Result<(), EncodeError> {
    ensure!(!target.is_empty(), EncodeError::invalid_head("empty request target"));
    ensure!(
        target.bytes().all(|b| b > b' ' && b != 0x7f),
        EncodeError::invalid_head(format!("request target {target:?} contains whitespace or control characters"))
    );
    Ok(())
}

fn check_name(name: &str) -> Result<(), EncodeError> {
    ensure!(
        !name.is_empty() && name.bytes().all(is_token),
        EncodeError::invalid_head(format!("header name {name:?} is not a token"))
    );
    Ok(())
}

#[inline]
fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Trims surrounding blanks and folds inner CR and LF into spaces, so the value reads
/// back exactly as written.
fn clean_value<'a>(name: &str, value: &'a str) -> Result<Cow<'a, str>, EncodeError> {
    let value = value.trim_matches([' ', '\t', '\r', '\n']);
    ensure!(
        value.bytes().all(|b| matches!(b, b'\t' | b'\r' | b'\n') || (b >= b' ' && b != 0x7f)),
        EncodeError::invalid_head(format!("value of {name} contains control characters"))
    );

    if value.contains(['\r', '\n']) {
        Ok(Cow::Owned(value.replace(['\r', '\n'], " ")))
    } else {
        Ok(Cow::Borrowed(value))
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Enough space has been reserved up front, so writes never fail.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn encode(request: &WireRequest) -> String {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(request, &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn request_line_and_host() {
        let request = WireRequest::get("http://test.test/test").unwrap();

        assert_eq!(encode(&request), "GET /test HTTP/1.1\r\nHost: test.test\r\n\r\n");
    }

    #[test]
    fn headers_keep_order_and_case() {
        let request = WireRequest::builder()
            .method(Method::POST)
            .uri("http://127.0.0.1:8080/index.html?a=1")
            .header("User-Agent", "curl/7.79.1")
            .header("accept", "*/*")
            .header("X-Dup", "1")
            .header("X-Dup", "2")
            .build()
            .unwrap();

        let expected = concat!(
            "POST /index.html?a=1 HTTP/1.1\r\n",
            "Host: 127.0.0.1:8080\r\n",
            "User-Agent: curl/7.79.1\r\n",
            "accept: */*\r\n",
            "X-Dup: 1\r\n",
            "X-Dup: 2\r\n",
            "\r\n",
        );
        assert_eq!(encode(&request), expected);
    }

    #[test]
    fn no_host_line_without_host() {
        let request = WireRequest::new(Method::OPTIONS, "*");

        assert_eq!(encode(&request), "OPTIONS * HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn line_breaks_in_values_are_folded() {
        let request = WireRequest::builder()
            .uri("http://test.test/")
            .header("X-A", "1\r\nContent-Length: 100")
            .header("X-B", "  padded\t ")
            .build()
            .unwrap();

        let expected = concat!(
            "GET / HTTP/1.1\r\n",
            "Host: test.test\r\n",
            "X-A: 1  Content-Length: 100\r\n",
            "X-B: padded\r\n",
            "\r\n",
        );
        assert_eq!(encode(&request), expected);
    }

    #[test]
    fn host_field_in_list_is_never_a_second_line() {
        let mut request = WireRequest::get("http://test.test/a").unwrap();
        request.headers_mut().append("Host", "other.test");
        assert_eq!(encode(&request), "GET /a HTTP/1.1\r\nHost: test.test\r\n\r\n");

        let mut request = WireRequest::new(Method::GET, "/a");
        request.headers_mut().append("Accept", "*/*");
        request.headers_mut().append("host", "other.test");
        assert_eq!(encode(&request), "GET /a HTTP/1.1\r\nHost: other.test\r\nAccept: */*\r\n\r\n");
    }

    #[test]
    fn rejects_unwritable_heads() {
        let mut dst = BytesMut::from("kept");

        let request = WireRequest::new(Method::GET, "/a b");
        let err = HeaderEncoder.encode(&request, &mut dst).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidHead { .. }));

        let request = WireRequest::new(Method::GET, "/a\r\nX-Injected: 1");
        assert!(HeaderEncoder.encode(&request, &mut dst).is_err());

        let request = WireRequest::new(Method::GET, "");
        assert!(HeaderEncoder.encode(&request, &mut dst).is_err());

        let mut request = WireRequest::new(Method::GET, "/");
        request.headers_mut().append("X A", "1");
        assert!(HeaderEncoder.encode(&request, &mut dst).is_err());

        let mut request = WireRequest::new(Method::GET, "/");
        request.headers_mut().append("X-A", "a\0b");
        assert!(HeaderEncoder.encode(&request, &mut dst).is_err());

        assert_eq!(&dst[..], b"kept");
    }
}
