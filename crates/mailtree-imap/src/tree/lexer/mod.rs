//! IMAP lexer for tokenizing server responses.
//!
//! This module breaks raw response bytes into lexemes that the
//! [`reader`](super::reader) assembles into token trees.

#![allow(clippy::missing_errors_doc)]

mod token;

pub use token::Lexeme;

use crate::{Error, Result};

/// IMAP lexer state.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the remaining input.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Peeks at the current byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peeks at the byte at offset from current position.
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advances by one byte and returns it.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skips n bytes.
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Reads the next lexeme.
    pub fn next_lexeme(&mut self) -> Result<Lexeme<'a>> {
        let Some(byte) = self.peek() else {
            return Ok(Lexeme::Eof);
        };

        match byte {
            b'\r' => {
                if self.peek_at(1) == Some(b'\n') {
                    self.skip(2);
                    Ok(Lexeme::Crlf)
                } else {
                    Err(self.error("Expected LF after CR"))
                }
            }
            // Bare LF from sloppy servers.
            b'\n' => {
                self.advance();
                Ok(Lexeme::Crlf)
            }

            b' ' => {
                self.advance();
                Ok(Lexeme::Space)
            }

            b'(' => {
                self.advance();
                Ok(Lexeme::LParen)
            }
            b')' => {
                self.advance();
                Ok(Lexeme::RParen)
            }
            b'[' => {
                self.advance();
                Ok(Lexeme::LBracket)
            }
            b']' => {
                self.advance();
                Ok(Lexeme::RBracket)
            }
            b'*' => {
                self.advance();
                Ok(Lexeme::Asterisk)
            }
            b'+' => {
                self.advance();
                Ok(Lexeme::Plus)
            }

            b'"' => self.read_quoted_string(),

            b'{' => self.read_literal_prefix(),

            _ if is_atom_char(byte) => self.read_atom(),

            _ => Err(self.error(&format!("Unexpected character: {byte:#04x}"))),
        }
    }

    /// Reads a quoted string lexeme.
    fn read_quoted_string(&mut self) -> Result<Lexeme<'a>> {
        self.advance(); // Skip opening quote

        let mut result = Vec::new();

        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(b'"') => result.push(b'"'),
                    Some(b'\\') => result.push(b'\\'),
                    Some(c) => {
                        // In IMAP, only " and \ can be escaped
                        return Err(self.error(&format!("Invalid escape: \\{}", char::from(c))));
                    }
                    None => return Err(self.error("Unexpected EOF in quoted string")),
                },
                Some(c) => result.push(c),
                None => return Err(self.error("Unexpected EOF in quoted string")),
            }
        }

        Ok(Lexeme::QuotedString(text_from_bytes(result)))
    }

    /// Reads a literal size prefix {n} and the literal data.
    fn read_literal_prefix(&mut self) -> Result<Lexeme<'a>> {
        self.advance(); // Skip {

        let start = self.pos;
        let mut literal_plus = false;

        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' if !literal_plus => {
                    self.advance();
                }
                b'+' => {
                    literal_plus = true;
                    self.advance();
                }
                b'}' => break,
                _ => return Err(self.error("Invalid character in literal size")),
            }
        }

        let size_str = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("Invalid literal size"))?
            .trim_end_matches('+');

        let size: usize = size_str
            .parse()
            .map_err(|_| self.error("Invalid literal size number"))?;

        if self.advance() != Some(b'}') {
            return Err(self.error("Expected } after literal size"));
        }

        if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
            self.skip(2);
        } else if self.peek() == Some(b'\n') {
            self.advance();
        } else if !literal_plus {
            return Err(self.error("Expected CRLF after literal size"));
        }

        if size > self.input.len() - self.pos {
            return Err(self.error("Incomplete literal data"));
        }

        let data = self.input[self.pos..self.pos + size].to_vec();
        self.skip(size);

        Ok(Lexeme::Literal(data))
    }

    /// Reads an atom lexeme.
    ///
    /// A `[section]` directly attached to the atom, and whatever atom
    /// characters follow it, stay part of the atom. That keeps FETCH items
    /// such as `BODY[HEADER.FIELDS (SUBJECT)]<0>` in one piece.
    fn read_atom(&mut self) -> Result<Lexeme<'a>> {
        let start = self.pos;

        self.consume_atom_chars();
        while self.peek() == Some(b'[') {
            self.consume_section()?;
            self.consume_atom_chars();
        }

        let s = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("Invalid UTF-8 in atom"))?;

        if s.eq_ignore_ascii_case("NIL") {
            Ok(Lexeme::Nil)
        } else {
            Ok(Lexeme::Atom(s))
        }
    }

    fn consume_atom_chars(&mut self) {
        while let Some(b) = self.peek() {
            if is_atom_char(b) {
                self.advance();
            } else if b == b'*' && self.pos > 0 && self.input[self.pos - 1] == b'\\' {
                // The `\*` wildcard of PERMANENTFLAGS.
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consumes a bracketed section, honouring nesting and quoted strings.
    fn consume_section(&mut self) -> Result<()> {
        let mut depth = 0usize;
        let mut quoted = false;

        while let Some(b) = self.advance() {
            match b {
                b'\\' if quoted => {
                    self.advance();
                }
                b'"' => quoted = !quoted,
                b'[' if !quoted => depth += 1,
                b']' if !quoted => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                b'\r' | b'\n' => break,
                _ => {}
            }
        }

        Err(self.error("Unterminated section"))
    }

    /// Creates a parse error at the current position.
    pub(crate) fn error(&self, message: &str) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }

    /// Expects and consumes a specific lexeme.
    #[allow(clippy::needless_pass_by_value)]
    pub fn expect(&mut self, expected: Lexeme<'_>) -> Result<()> {
        let lexeme = self.next_lexeme()?;
        if std::mem::discriminant(&lexeme) == std::mem::discriminant(&expected) {
            Ok(())
        } else {
            Err(self.error(&format!("Expected {expected:?}, got {lexeme:?}")))
        }
    }

    /// Expects and consumes a space.
    pub fn expect_space(&mut self) -> Result<()> {
        self.expect(Lexeme::Space)
    }

    /// Reads an atom.
    pub fn read_atom_string(&mut self) -> Result<&'a str> {
        match self.next_lexeme()? {
            Lexeme::Atom(s) => Ok(s),
            lexeme => Err(self.error(&format!("Expected atom, got {lexeme:?}"))),
        }
    }

    /// Skips optional spaces.
    pub fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.advance();
        }
    }

    /// Reads text up to the end of the line and consumes the line ending.
    pub fn read_text_until_crlf(&mut self) -> String {
        let remaining = self.remaining();

        let end = remaining
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .unwrap_or(remaining.len());

        self.skip(end);
        if self.peek() == Some(b'\r') {
            self.advance();
        }
        if self.peek() == Some(b'\n') {
            self.advance();
        }

        text_from_bytes(remaining[..end].to_vec())
    }
}

/// Converts raw bytes to text, reading invalid UTF-8 as 8-bit text.
pub(crate) fn text_from_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Returns true if the byte is a valid atom character.
///
/// Note: This includes `\` to handle flags like `\Seen` as single lexemes,
/// even though RFC 9051 technically defines `\` as a quoted-special.
#[must_use]
pub const fn is_atom_char(b: u8) -> bool {
    // atom-specials = "(" / ")" / "{" / SP / CTL / list-wildcards / quoted-specials / resp-specials
    matches!(b,
        0x21 |         // !
        0x23..=0x24 |  // # $
        0x26..=0x27 |  // & '
        0x2B..=0x5A |  // + , - . / 0-9 : ; < = > ? @ A-Z
        0x5C |         // \ (for flags like \Seen)
        0x5E..=0x7A |  // ^ _ ` a-z
        0x7C |         // |
        0x7E           // ~
    )
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
    fn test_simple_lexemes() {
        let mut lexer = Lexer::new(b"* OK");

        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Asterisk);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Space);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Atom("OK"));
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Eof);
    }

    #[test]
    fn test_numbers_are_atoms() {
        let mut lexer = Lexer::new(b"123 456");

        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Atom("123"));
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Space);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Atom("456"));
    }

    #[test]
    fn test_quoted_string_escaped() {
        let mut lexer = Lexer::new(b"\"hello \\\"world\\\"\"");

        assert_eq!(
            lexer.next_lexeme().unwrap(),
            Lexeme::QuotedString("hello \"world\"".to_string())
        );
    }

    #[test]
    fn test_quoted_string_8bit() {
        let mut lexer = Lexer::new(b"\"B\xFCro\"");

        assert_eq!(
            lexer.next_lexeme().unwrap(),
            Lexeme::QuotedString("Büro".to_string())
        );
    }

    #[test]
    fn test_quoted_string_unterminated() {
        let mut lexer = Lexer::new(b"\"open");
        assert!(matches!(lexer.next_lexeme(), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_nil() {
        let mut lexer = Lexer::new(b"NIL nil");

        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Nil);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Space);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Nil);
    }

    #[test]
    fn test_permanent_flags_wildcard() {
        let mut lexer = Lexer::new(b"(\\Seen \\*)");

        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::LParen);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Atom("\\Seen"));
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Space);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Atom("\\*"));
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::RParen);
    }

    #[test]
    fn test_brackets() {
        let mut lexer = Lexer::new(b"[UIDNEXT 100]");

        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::LBracket);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Atom("UIDNEXT"));
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Space);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Atom("100"));
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::RBracket);
    }

    #[test]
    fn test_body_section_stays_in_atom() {
        let mut lexer = Lexer::new(b"BODY[HEADER.FIELDS (SUBJECT \"X-A]\")]<0> {3}\r\nabc");

        assert_eq!(
            lexer.next_lexeme().unwrap(),
            Lexeme::Atom("BODY[HEADER.FIELDS (SUBJECT \"X-A]\")]<0>")
        );
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Space);
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Literal(b"abc".to_vec()));
    }

    #[test]
    fn test_unterminated_section() {
        let mut lexer = Lexer::new(b"BODY[TEXT\r\n");
        assert!(lexer.next_lexeme().is_err());
    }

    #[test]
    fn test_literal() {
        let mut lexer = Lexer::new(b"{5}\r\nhello");

        match lexer.next_lexeme().unwrap() {
            Lexeme::Literal(data) => assert_eq!(data, b"hello"),
            other => panic!("Expected literal, got {other:?}"),
        }
    }

    #[test]
    fn test_literal_plus() {
        let mut lexer = Lexer::new(b"{2+}\r\nhi");
        assert_eq!(lexer.next_lexeme().unwrap(), Lexeme::Literal(b"hi".to_vec()));
    }

    #[test]
    fn test_literal_truncated() {
        let mut lexer = Lexer::new(b"{10}\r\nshort");
        assert!(lexer.next_lexeme().is_err());
    }

    #[test]
    fn test_read_text_until_crlf() {
        let mut lexer = Lexer::new(b"SELECT completed\r\nnext");
        assert_eq!(lexer.read_text_until_crlf(), "SELECT completed");
        assert_eq!(lexer.remaining(), b"next");
    }

    #[test]
    fn test_is_atom_char() {
        assert!(is_atom_char(b'A'));
        assert!(is_atom_char(b'0'));
        assert!(is_atom_char(b'\\'));
        assert!(is_atom_char(b'<'));
        assert!(!is_atom_char(b' '));
        assert!(!is_atom_char(b'('));
        assert!(!is_atom_char(b'{'));
        assert!(!is_atom_char(b'"'));
        assert!(!is_atom_char(b'%'));
        assert!(!is_atom_char(b'*'));
        assert!(!is_atom_char(b'['));
        assert!(!is_atom_char(b']'));
    }
}
