use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerdeError {
    #[error(transparent)]
    Encode {
        #[from]
        source: EncodeError,
    },

    #[error(transparent)]
    Decode {
        #[from]
        source: ParseError,
    },
}

impl SerdeError {
    /// Returns the encode error if this failure happened while serializing.
    pub fn as_encode(&self) -> Option<&EncodeError> {
        match self {
            SerdeError::Encode { source } => Some(source),
            SerdeError::Decode { .. } => None,
        }
    }

    /// Returns the parse error if this failure happened while deserializing.
    pub fn as_decode(&self) -> Option<&ParseError> {
        match self {
            SerdeError::Encode { .. } => None,
            SerdeError::Decode { source } => Some(source),
        }
    }
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("serialize called on nil request")]
    NilInput,

    /// The body stream failed while being drained, the original error is kept as is.
    #[error(transparent)]
    BodyRead(io::Error),

    /// The body stream failed to close, even if every byte was read.
    #[error(transparent)]
    BodyClose(io::Error),

    /// The request line or a header cannot be written without changing its framing.
    #[error("invalid request head: {reason}")]
    InvalidHead { reason: String },

    #[error("invalid http request: {source}")]
    Http {
        #[from]
        source: http::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl EncodeError {
    pub fn body_read(e: io::Error) -> Self {
        Self::BodyRead(e)
    }

    pub fn body_close(e: io::Error) -> Self {
        Self::BodyClose(e)
    }

    pub fn invalid_head<S: ToString>(str: S) -> Self {
        Self::InvalidHead { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid request line: {reason}")]
    InvalidRequestLine { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("too many Host headers")]
    DuplicateHost,

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("truncated body, content-length {expected} but only {actual} bytes remain")]
    TruncatedBody { expected: u64, actual: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line<S: ToString>(str: S) -> Self {
        Self::InvalidRequestLine { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn truncated_body(expected: u64, actual: usize) -> Self {
        Self::TruncatedBody { expected, actual }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Whether the input failed to parse at the request line or header stage.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ParseError::InvalidRequestLine { .. }
                | ParseError::TooLargeHeader { .. }
                | ParseError::TooManyHeaders { .. }
                | ParseError::InvalidHeader { .. }
                | ParseError::DuplicateHost
                | ParseError::InvalidVersion(_)
        )
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, ParseError::TruncatedBody { .. })
    }
}
