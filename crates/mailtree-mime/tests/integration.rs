//! Integration tests for header word decoding.

#![allow(clippy::unwrap_used)]

use mailtree_mime::{EncodedWord, Error, WordEncoding, decode_words, encode_word};

#[test]
fn test_rfc2047_examples() {
    // Section 8 of RFC 2047.
    let cases = [
        ("(=?ISO-8859-1?Q?a?=)", "(a)"),
        ("(=?ISO-8859-1?Q?a?= b)", "(a b)"),
        ("(=?ISO-8859-1?Q?a?= =?ISO-8859-1?Q?b?=)", "(ab)"),
        ("(=?ISO-8859-1?Q?a?=  =?ISO-8859-1?Q?b?=)", "(ab)"),
        ("(=?ISO-8859-1?Q?a?=\r\n    =?ISO-8859-1?Q?b?=)", "(ab)"),
        ("(=?ISO-8859-1?Q?a_b?=)", "(a b)"),
        ("(=?ISO-8859-1?Q?a?= =?ISO-8859-2?Q?_b?=)", "(a b)"),
    ];

    for (input, expected) in cases {
        assert_eq!(decode_words(input), expected, "input: {input:?}");
    }
}

#[test]
fn test_mixed_charsets_and_encodings() {
    let input = "=?UTF-8?B?5pel5pys6Kqe?= =?iso-8859-15?q?=A4uro?= plain";
    assert_eq!(decode_words(input), "日本語€uro plain");
}

#[test]
fn test_unknown_charset_falls_back() {
    assert_eq!(decode_words("=?x-unknown?Q?abc?="), "abc");
    assert_eq!(decode_words("=?x-unknown?Q?=E9t=E9?="), "été");
}

#[test]
fn test_malformed_words_verbatim() {
    let cases = [
        "=?UTF-8?X?abc?=",
        "=?UTF-8?Q?no end",
        "=??Q?abc?=",
        "=?UTF-8?B?***?=",
        "----sinikael-?=_1-14105085265110.49903922458179295",
        "a =? b ?= c",
    ];

    for input in cases {
        assert_eq!(decode_words(input), input);
    }
}

#[test]
fn test_strict_parse() {
    let word = EncodedWord::parse("=?utf-8*en?Q?hi?=").unwrap();
    assert_eq!(word.charset, "utf-8*en");
    assert_eq!(word.encoding, WordEncoding::Q);
    assert_eq!(word.decode().unwrap(), "hi");

    assert!(matches!(
        EncodedWord::parse("=?utf-8?Z?hi?="),
        Err(Error::UnknownEncoding(_))
    ));
    assert!(matches!(
        EncodedWord::parse("=?utf-8?Q?hi?= trailing"),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn test_encode_then_decode() {
    for encoding in [WordEncoding::Q, WordEncoding::B] {
        let word = encode_word("Grüße aus Köln", "UTF-8", encoding);
        assert!(word.starts_with("=?UTF-8?"));
        assert_eq!(decode_words(&word), "Grüße aus Köln");
    }

    assert_eq!(encode_word("plain", "UTF-8", WordEncoding::Q), "plain");
}
