//! HTTP request head processing
//!
//! The head is the request line plus the header block, up to and including the blank
//! line that separates it from the body.
//!
//! # Components
//!
//! - [`HeaderDecoder`]: parses a request head from raw bytes
//!   - Rejects anything but HTTP/1.1
//!   - Enforces the limits of a [`DecoderConfig`](crate::codec::DecoderConfig)
//!   - Lifts the `Host` header out of the header list
//!
//! - [`HeaderEncoder`]: writes a request head
//!   - `Host` right after the request line
//!   - Remaining headers in insertion order, original spelling

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
