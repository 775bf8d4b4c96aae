//! Payload codecs for RFC 2047 encoded-words.
//!
//! Supports the `B` (Base64) and `Q` (header Quoted-Printable) encodings.

use std::fmt::Write as _;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::Result;

/// Base64 engine that tolerates missing or superfluous padding.
///
/// Servers regularly truncate the trailing `=` of encoded-words.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encoding marker of an encoded-word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordEncoding {
    /// `Q` encoding: Quoted-Printable with `_` standing for space.
    Q,
    /// `B` encoding: Base64.
    B,
}

impl WordEncoding {
    /// Parses an encoding marker (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Q" | "q" => Some(Self::Q),
            "B" | "b" => Some(Self::B),
            _ => None,
        }
    }

    /// Returns the marker as written in an encoded-word.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Q => "Q",
            Self::B => "B",
        }
    }

    /// Decodes a payload into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if a `B` payload is not valid Base64.
    pub fn decode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Q => Ok(decode_q(text)),
            Self::B => decode_b(text),
        }
    }

    /// Encodes raw bytes into a payload.
    #[must_use]
    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Self::Q => encode_q(data),
            Self::B => STANDARD.encode(data),
        }
    }
}

impl std::fmt::Display for WordEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes a `Q` payload.
///
/// `_` is a space and `=XX` a hex escape. A broken escape is kept
/// literally instead of failing.
#[must_use]
pub fn decode_q(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'_' => out.push(b' '),
            b'=' => {
                if let Some(byte) = bytes.get(i + 1..i + 3).and_then(hex_byte) {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'=');
            }
            b => out.push(b),
        }
        i += 1;
    }

    out
}

/// Encodes bytes as a `Q` payload.
///
/// Letters, digits and `!*+-/` pass through, space becomes `_` and every
/// other byte is escaped, which keeps the result safe in any header
/// position (RFC 2047 section 5 rule 3).
#[must_use]
pub fn encode_q(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());

    for &byte in data {
        match byte {
            b' ' => out.push('_'),
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'!' | b'*' | b'+' | b'-' | b'/' => {
                out.push(char::from(byte));
            }
            _ => {
                let _ = write!(out, "={byte:02X}");
            }
        }
    }

    out
}

/// Decodes a `B` payload.
///
/// # Errors
///
/// Returns an error if the payload is not valid Base64.
pub fn decode_b(text: &str) -> Result<Vec<u8>> {
    LENIENT_BASE64.decode(text.trim()).map_err(Into::into)
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let hi = char::from(pair[0]).to_digit(16)?;
    let lo = char::from(pair[1]).to_digit(16)?;
    u8::try_from(hi * 16 + lo).ok()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_q() {
        assert_eq!(decode_q("H=C3=A9llo"), "Héllo".as_bytes());
        assert_eq!(decode_q("a_b"), b"a b");
        assert_eq!(decode_q("B=FCro"), b"B\xFCro");
    }

    #[test]
    fn test_decode_q_lowercase_hex() {
        assert_eq!(decode_q("=c3=a9"), "é".as_bytes());
    }

    #[test]
    fn test_decode_q_broken_escape_kept() {
        assert_eq!(decode_q("100=%"), b"100=%");
        assert_eq!(decode_q("end="), b"end=");
        assert_eq!(decode_q("=Z1"), b"=Z1");
    }

    #[test]
    fn test_encode_q() {
        assert_eq!(encode_q(b"Hello World"), "Hello_World");
        assert_eq!(encode_q("Héllo".as_bytes()), "H=C3=A9llo");
        assert_eq!(encode_q(b"a=b?c_d"), "a=3Db=3Fc=5Fd");
    }

    #[test]
    fn test_decode_b() {
        assert_eq!(decode_b("SMOpbGxv").unwrap(), "Héllo".as_bytes());
        assert_eq!(decode_b("SGVsbG8sIFdvcmxkIQ==").unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_decode_b_missing_padding() {
        assert_eq!(decode_b("SGVsbG8sIFdvcmxkIQ").unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_decode_b_invalid() {
        assert!(decode_b("not base64!").is_err());
    }

    #[test]
    fn test_word_encoding_parse() {
        assert_eq!(WordEncoding::parse("q"), Some(WordEncoding::Q));
        assert_eq!(WordEncoding::parse("B"), Some(WordEncoding::B));
        assert_eq!(WordEncoding::parse("X"), None);
        assert_eq!(WordEncoding::parse("QQ"), None);
    }
}
