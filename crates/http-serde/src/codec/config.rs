/// Default maximum number of header lines in a request head, `Host` included
pub const DEFAULT_MAX_HEADERS: usize = 128;

/// Default maximum size in bytes of a request head, request line and blank line included
pub const DEFAULT_MAX_HEAD_BYTES: usize = 64 * 1024;

/// Limits applied while decoding a request head.
///
/// A head exceeding either limit is rejected as malformed. [`RequestDecoder::new`]
/// reading from a stream uses the defaults, while one-shot [`decode`] reads a dump that is
/// already in memory and uses [`DecoderConfig::unlimited`], so whatever the encoder wrote
/// can be read back.
///
/// [`RequestDecoder::new`]: crate::codec::RequestDecoder::new
/// [`decode`]: crate::codec::decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    max_headers: usize,
    max_head_bytes: usize,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No limit on header count or head size.
    pub fn unlimited() -> Self {
        Self { max_headers: usize::MAX, max_head_bytes: usize::MAX }
    }

    pub fn max_headers(&self) -> usize {
        self.max_headers
    }

    pub fn max_head_bytes(&self) -> usize {
        self.max_head_bytes
    }

    #[must_use]
    pub fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    #[must_use]
    pub fn with_max_head_bytes(mut self, max_head_bytes: usize) -> Self {
        self.max_head_bytes = max_head_bytes;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { max_headers: DEFAULT_MAX_HEADERS, max_head_bytes: DEFAULT_MAX_HEAD_BYTES }
    }
}
