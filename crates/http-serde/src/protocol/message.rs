/// Size of the body that follows a request head.
///
/// Only length framing exists here; a head without a usable `Content-Length` has no body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Empty payload (no body)
    Empty,
}

impl PayloadSize {
    #[inline]
    pub fn new_length(length: u64) -> Self {
        PayloadSize::Length(length)
    }

    #[inline]
    pub fn new_empty() -> Self {
        PayloadSize::Empty
    }
}
