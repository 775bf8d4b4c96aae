//! Charset conversion for decoded encoded-word payloads.

use encoding_rs::Encoding;

/// Converts `bytes` labelled with `label` into a Rust string.
///
/// Labels are resolved with the WHATWG label table, so aliases such as
/// `latin1`, `ISO-8859-1` or `cp1252` all work. An RFC 2231 language
/// suffix (`utf-8*en`) is ignored.
///
/// Unknown labels never fail: the bytes are read as UTF-8 when they are
/// valid UTF-8 and as raw 8-bit text (one char per byte) otherwise.
#[must_use]
pub fn decode_charset(bytes: &[u8], label: &str) -> String {
    let label = strip_language(label);

    match lookup(label) {
        Some(encoding) => {
            let (text, malformed) = encoding.decode_without_bom_handling(bytes);
            if malformed {
                tracing::debug!(charset = label, "replaced malformed sequences while decoding");
            }
            text.into_owned()
        }
        None => {
            tracing::debug!(charset = label, "unknown charset, keeping raw 8-bit text");
            raw_text(bytes)
        }
    }
}

/// Resolves a charset label to an encoding.
///
/// UTF-7 is rejected because `encoding_rs` cannot decode it; callers get
/// the raw-text fallback instead of a replacement-character mess.
#[must_use]
pub fn lookup(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label_no_replacement(strip_language(label).trim().as_bytes())
}

/// Reads bytes as UTF-8 when possible, else as Latin-1 style 8-bit text.
#[must_use]
pub fn raw_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().copied().map(char::from).collect(),
    }
}

fn strip_language(label: &str) -> &str {
    label.split_once('*').map_or(label, |(charset, _)| charset)
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
    fn test_decode_latin1() {
        assert_eq!(decode_charset(b"B\xFCro", "ISO-8859-1"), "Büro");
        assert_eq!(decode_charset(b"B\xFCro", "latin1"), "Büro");
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_charset("Héllo".as_bytes(), "UTF-8"), "Héllo");
        assert_eq!(decode_charset("Héllo".as_bytes(), "utf-8*en"), "Héllo");
    }

    #[test]
    fn test_decode_shift_jis() {
        assert_eq!(decode_charset(b"\x93\xfa\x96\x7b", "Shift_JIS"), "日本");
    }

    #[test]
    fn test_unknown_charset_falls_back() {
        assert_eq!(decode_charset(b"plain", "x-made-up"), "plain");
        assert_eq!(decode_charset(b"B\xFCro", "x-made-up"), "Büro");
        assert_eq!(decode_charset("Grüße".as_bytes(), "x-made-up"), "Grüße");
    }

    #[test]
    fn test_utf7_is_not_resolved() {
        assert!(lookup("UTF-7").is_none());
        assert!(lookup("utf-8").is_some());
    }
}
