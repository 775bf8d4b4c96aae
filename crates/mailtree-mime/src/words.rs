//! RFC 2047 encoded-words in header text.
//!
//! Display names, subjects and filenames arrive from IMAP servers as raw
//! header text that may contain `=?charset?encoding?text?=` words. This
//! module decodes them into plain Rust strings.

use crate::charset::decode_charset;
use crate::encoding::WordEncoding;
use crate::error::{Error, Result};

/// Opening delimiter of an encoded-word.
const WORD_START: &str = "=?";
/// Closing delimiter of an encoded-word.
const WORD_END: &str = "?=";

/// A single, syntactically valid encoded-word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedWord<'a> {
    /// Charset label, including any RFC 2231 `*language` suffix.
    pub charset: &'a str,
    /// Payload encoding.
    pub encoding: WordEncoding,
    /// Encoded payload between the third `?` and the closing `?=`.
    pub text: &'a str,
}

impl<'a> EncodedWord<'a> {
    /// Parses `input` as exactly one encoded-word.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when the syntax is wrong and
    /// [`Error::UnknownEncoding`] for markers other than `Q`/`B`.
    pub fn parse(input: &'a str) -> Result<Self> {
        match Self::parse_prefix(input)? {
            (word, len) if len == input.len() => Ok(word),
            _ => Err(Error::Malformed(input.to_string())),
        }
    }

    /// Parses an encoded-word at the start of `input`.
    ///
    /// Returns the word and the number of bytes it spans.
    fn parse_prefix(input: &'a str) -> Result<(Self, usize)> {
        let malformed = || Error::Malformed(input.to_string());

        let body = input.strip_prefix(WORD_START).ok_or_else(malformed)?;
        let (charset, rest) = body.split_once('?').ok_or_else(malformed)?;
        let (marker, rest) = rest.split_once('?').ok_or_else(malformed)?;
        let end = rest.find(WORD_END).ok_or_else(malformed)?;
        let text = &rest[..end];

        if charset.is_empty() || !charset.bytes().all(is_charset_byte) {
            return Err(malformed());
        }
        if text.bytes().any(|b| b == b'?' || b.is_ascii_whitespace()) {
            return Err(malformed());
        }
        let encoding =
            WordEncoding::parse(marker).ok_or_else(|| Error::UnknownEncoding(marker.to_string()))?;

        // "=?" + charset + "?" + marker + "?" + text + "?="
        let len = WORD_START.len() + charset.len() + marker.len() + text.len() + 2 + WORD_END.len();

        Ok((
            Self {
                charset,
                encoding,
                text,
            },
            len,
        ))
    }

    /// Decodes the word into text.
    ///
    /// # Errors
    ///
    /// Returns an error if a `B` payload is not valid Base64. Charset
    /// problems never fail, see [`decode_charset`].
    pub fn decode(&self) -> Result<String> {
        let bytes = self.encoding.decode(self.text)?;
        Ok(decode_charset(&bytes, self.charset))
    }
}

/// Decodes every encoded-word in `text`.
///
/// Linear whitespace between two adjacent encoded-words is dropped; all
/// other text, including whitespace next to plain words, is kept as is.
/// Words that are malformed or fail to decode are left verbatim, so
/// strings that merely resemble encoded-word syntax (for example a MIME
/// boundary containing `?=`) pass through unchanged.
#[must_use]
pub fn decode_words(text: &str) -> String {
    if !text.contains(WORD_START) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    // Start of text not yet copied into `out`.
    let mut copied = 0;
    // Whether the last thing copied was a decoded word.
    let mut after_word = false;
    let mut search = 0;

    while let Some(offset) = text[search..].find(WORD_START) {
        let start = search + offset;

        let Some((decoded, len)) = decode_at(&text[start..]) else {
            search = start + 1;
            continue;
        };

        let gap = &text[copied..start];
        if !(after_word && is_linear_whitespace(gap)) {
            out.push_str(gap);
        }
        out.push_str(&decoded);

        copied = start + len;
        search = copied;
        after_word = true;
    }

    out.push_str(&text[copied..]);
    out
}

/// Encodes `text` as a single encoded-word.
///
/// Pure ASCII text without `=`, `?` or `_` is returned unchanged; in that
/// case the word would decode to the same text anyway.
#[must_use]
pub fn encode_word(text: &str, charset: &str, encoding: WordEncoding) -> String {
    if text
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && !matches!(c, '=' | '?' | '_'))
        && !text.contains(char::is_whitespace)
    {
        return text.to_string();
    }

    format!(
        "{WORD_START}{charset}?{encoding}?{}{WORD_END}",
        encoding.encode(text.as_bytes())
    )
}

fn decode_at(input: &str) -> Option<(String, usize)> {
    let (word, len) = match EncodedWord::parse_prefix(input) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::trace!(error = %e, "not an encoded-word");
            return None;
        }
    };

    match word.decode() {
        Ok(decoded) => Some((decoded, len)),
        Err(e) => {
            tracing::debug!(error = %e, charset = word.charset, "leaving undecodable word as is");
            None
        }
    }
}

fn is_linear_whitespace(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Bytes allowed in a charset label: printable ASCII except `?`.
///
/// Labels outside the registry (`ANSI_X3.4-1968`, `utf-8*en`) still
/// parse and are left to the charset fallback.
const fn is_charset_byte(b: u8) -> bool {
    b.is_ascii_graphic() && b != b'?'
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
    use proptest::prelude::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(decode_words("Hello World"), "Hello World");
        assert_eq!(decode_words(""), "");
    }

    #[test]
    fn test_single_b_word() {
        assert_eq!(decode_words("=?utf-8?B?SMOpbGxv?="), "Héllo");
    }

    #[test]
    fn test_single_q_word() {
        assert_eq!(decode_words("=?utf-8?Q?H=C3=A9llo?="), "Héllo");
        assert_eq!(decode_words("=?UTF-8?q?a_b?="), "a b");
    }

    #[test]
    fn test_adjacent_words_drop_whitespace() {
        let input = "=?ISO-8859-1?Q?BBR_Handel,_Gewerbe,_B=FCrobetriebe,?= =?ISO-8859-1?Q?_private_Bildungseinrichtungen.txt?=";
        assert_eq!(
            decode_words(input),
            "BBR Handel, Gewerbe, Bürobetriebe, private Bildungseinrichtungen.txt"
        );
    }

    #[test]
    fn test_folded_whitespace_between_words() {
        assert_eq!(decode_words("=?utf-8?Q?a?=\r\n =?utf-8?Q?b?="), "ab");
        assert_eq!(decode_words("=?utf-8?Q?a?=\t=?utf-8?Q?b?="), "ab");
    }

    #[test]
    fn test_whitespace_next_to_plain_text_kept() {
        assert_eq!(decode_words("Re: =?utf-8?Q?caf=C3=A9?= now"), "Re: café now");
        assert_eq!(decode_words("=?utf-8?Q?a?= x =?utf-8?Q?b?="), "a x b");
    }

    #[test]
    fn test_unknown_charset_falls_back() {
        assert_eq!(decode_words("=?x-unknown?Q?B=FCro?="), "Büro");
    }

    #[test]
    fn test_unregistered_label_with_dots() {
        assert_eq!(
            decode_words("=?ANSI_X3.4-1968?Q?Hello_World?="),
            "Hello World"
        );
        assert_eq!(decode_words("=?x.y(z)?Q?B=FCro?="), "Büro");
    }

    #[test]
    fn test_language_suffix() {
        assert_eq!(decode_words("=?US-ASCII*EN?Q?Keith_Moore?="), "Keith Moore");
    }

    #[test]
    fn test_malformed_words_pass_through() {
        let boundary = "----sinikael-?=_1-14105085265110.49903922458179295";
        assert_eq!(decode_words(boundary), boundary);

        assert_eq!(decode_words("=?utf-8?X?abc?="), "=?utf-8?X?abc?=");
        assert_eq!(decode_words("=?utf-8?Q?no end"), "=?utf-8?Q?no end");
        assert_eq!(decode_words("=??Q?abc?="), "=??Q?abc?=");
        assert_eq!(decode_words("=?utf-8?Q?has space?="), "=?utf-8?Q?has space?=");
        assert_eq!(decode_words("=?utf-8?B?!!!?="), "=?utf-8?B?!!!?=");
    }

    #[test]
    fn test_malformed_word_then_valid_word() {
        assert_eq!(decode_words("=?bad =?utf-8?Q?ok?="), "=?bad ok");
    }

    #[test]
    fn test_non_ascii_text_around_words() {
        assert_eq!(decode_words("Grüße =?utf-8?Q?=C3=A9?="), "Grüße é");
    }

    #[test]
    fn test_encoded_word_parse_strict() {
        let word = EncodedWord::parse("=?utf-8?B?SMOpbGxv?=").unwrap();
        assert_eq!(word.charset, "utf-8");
        assert_eq!(word.encoding, WordEncoding::B);
        assert_eq!(word.text, "SMOpbGxv");
        assert_eq!(word.decode().unwrap(), "Héllo");

        assert!(matches!(
            EncodedWord::parse("=?utf-8?B?SMOpbGxv?= tail"),
            Err(Error::Malformed(_))
        ));
        assert!(matches!(
            EncodedWord::parse("=?utf-8?Z?abc?="),
            Err(Error::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_encode_word() {
        assert_eq!(encode_word("Hello", "utf-8", WordEncoding::Q), "Hello");
        assert_eq!(
            encode_word("Héllo", "utf-8", WordEncoding::Q),
            "=?utf-8?Q?H=C3=A9llo?="
        );
        assert_eq!(
            encode_word("Héllo", "utf-8", WordEncoding::B),
            "=?utf-8?B?SMOpbGxv?="
        );
    }

    proptest! {
        #[test]
        fn prop_q_roundtrip_ascii(s in "[ -~]{1,60}") {
            let word = format!("=?us-ascii?Q?{}?=", WordEncoding::Q.encode(s.as_bytes()));
            prop_assert_eq!(decode_words(&word), s);
        }

        #[test]
        fn prop_encode_word_roundtrip(s in "\\PC{0,40}") {
            let encoded = encode_word(&s, "utf-8", WordEncoding::Q);
            prop_assert_eq!(decode_words(&encoded), s.clone());
            let encoded = encode_word(&s, "utf-8", WordEncoding::B);
            prop_assert_eq!(decode_words(&encoded), s);
        }

        #[test]
        fn prop_plain_text_untouched(s in "[a-zA-Z0-9 ,.;:!-]{0,60}") {
            prop_assert_eq!(decode_words(&s), s);
        }
    }
}
