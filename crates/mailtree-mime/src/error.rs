//! Error types for encoded-word operations.

/// Result type alias for encoded-word operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a single encoded-word cannot be decoded.
///
/// These only surface through the strict [`EncodedWord::parse`] API.
/// [`decode_words`] never fails and leaves such words untouched.
///
/// [`EncodedWord::parse`]: crate::EncodedWord::parse
/// [`decode_words`]: crate::decode_words
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Text does not follow `=?charset?encoding?text?=` syntax.
    #[error("Malformed encoded-word: {0}")]
    Malformed(String),

    /// Encoding marker is neither `Q` nor `B`.
    #[error("Unknown encoded-word encoding: {0}")]
    UnknownEncoding(String),

    /// Payload of a `B` word is not valid Base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}
