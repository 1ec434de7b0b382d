//! HTTP body handling for dumped requests
//!
//! Bodies are always length framed. Before encoding, a streamed body is drained into
//! memory so its exact length is known up front.
//!
//! # Components
//!
//! - [`BodyNormalizer`]: drains a single use body stream into a re-readable buffer
//! - [`LengthEncoder`]: writes exactly `Content-Length` bytes of body
//! - [`LengthDecoder`]: reads exactly `Content-Length` bytes of body

mod length_decoder;
mod length_encoder;
mod normalizer;

pub use length_decoder::LengthDecoder;
pub use length_encoder::LengthEncoder;
pub use normalizer::BodyNormalizer;
