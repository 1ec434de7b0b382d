//! Core types of a dumped request.
//!
//! - [`WireRequest`]: method, target, host, ordered headers and body
//! - [`HeaderList`]: header fields in wire order with case-insensitive lookup
//! - [`ReqBody`] and [`BodyStream`]: single use streams and re-readable buffers
//! - [`PayloadSize`]: how much body follows a parsed head
//! - [`SerdeError`], [`EncodeError`], [`ParseError`]: failures of each direction

mod body;
pub use body::BodyStream;
pub use body::NopClose;
pub use body::ReqBody;

mod header;
pub use header::HeaderField;
pub use header::HeaderList;

mod message;
pub use message::PayloadSize;

mod request;
pub use request::Builder;
pub use request::WireRequest;
pub(crate) use request::{CONTENT_LENGTH, HOST};

mod error;
pub use error::EncodeError;
pub use error::ParseError;
pub use error::SerdeError;
