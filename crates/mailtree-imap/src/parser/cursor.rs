//! Positional access to token lists.
//!
//! IMAP data items are positional: ENVELOPE has ten slots, a body part
//! has seven fixed fields followed by type-specific and extension data.
//! [`Cursor`] walks such a list, checking each slot's token kind and
//! failing with a structural error that names the slot.

use crate::tree::Token;
use crate::{Error, Grammar, Result};

/// Index cursor over one token list.
pub struct Cursor<'t> {
    grammar: Grammar,
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    pub const fn new(grammar: Grammar, tokens: &'t [Token]) -> Self {
        Self {
            grammar,
            tokens,
            pos: 0,
        }
    }

    /// Number of tokens not yet consumed.
    pub const fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    /// Consumes a required slot.
    pub fn next(&mut self, field: &str) -> Result<&'t Token> {
        let token = self.tokens.get(self.pos).ok_or_else(|| {
            Error::structure(
                self.grammar,
                field,
                format!("missing, list has {} elements", self.tokens.len()),
            )
        })?;
        self.pos += 1;
        Ok(token)
    }

    /// Consumes an optional trailing slot.
    pub fn next_optional(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub fn text(&mut self, field: &str) -> Result<&'t str> {
        text(self.grammar, field, self.next(field)?)
    }

    pub fn nstring(&mut self, field: &str) -> Result<Option<&'t str>> {
        nstring(self.grammar, field, self.next(field)?)
    }

    pub fn list(&mut self, field: &str) -> Result<&'t [Token]> {
        list(self.grammar, field, self.next(field)?)
    }

    pub fn list_or_nil(&mut self, field: &str) -> Result<Option<&'t [Token]>> {
        list_or_nil(self.grammar, field, self.next(field)?)
    }

    pub fn number<T: std::str::FromStr>(&mut self, field: &str) -> Result<T> {
        number(self.grammar, field, self.next(field)?)
    }

    /// Consumes a required slot holding a number or NIL.
    pub fn number_or_nil<T: std::str::FromStr>(&mut self, field: &str) -> Result<Option<T>> {
        let token = self.next(field)?;
        if token.is_nil() {
            return Ok(None);
        }
        number(self.grammar, field, token).map(Some)
    }
}

fn unexpected(grammar: Grammar, field: &str, expected: &str, token: &Token) -> Error {
    Error::structure(
        grammar,
        field,
        format!("expected {expected}, got {}", token.kind()),
    )
}

/// Reads an atom or string.
pub fn text<'t>(grammar: Grammar, field: &str, token: &'t Token) -> Result<&'t str> {
    token
        .as_text()
        .ok_or_else(|| unexpected(grammar, field, "text", token))
}

/// Reads an atom, string or NIL.
pub fn nstring<'t>(grammar: Grammar, field: &str, token: &'t Token) -> Result<Option<&'t str>> {
    match token {
        Token::Nil => Ok(None),
        Token::Atom(s) | Token::String(s) => Ok(Some(s)),
        Token::List(_) => Err(unexpected(grammar, field, "text or NIL", token)),
    }
}

pub fn list<'t>(grammar: Grammar, field: &str, token: &'t Token) -> Result<&'t [Token]> {
    token
        .as_list()
        .ok_or_else(|| unexpected(grammar, field, "list", token))
}

pub fn list_or_nil<'t>(
    grammar: Grammar,
    field: &str,
    token: &'t Token,
) -> Result<Option<&'t [Token]>> {
    match token {
        Token::Nil => Ok(None),
        Token::List(items) => Ok(Some(items)),
        Token::Atom(_) | Token::String(_) => Err(unexpected(grammar, field, "list or NIL", token)),
    }
}

/// Reads an unsigned decimal number.
pub fn number<T: std::str::FromStr>(grammar: Grammar, field: &str, token: &Token) -> Result<T> {
    let value = text(grammar, field, token)?;
    if !is_decimal(value) {
        return Err(Error::structure(
            grammar,
            field,
            format!("expected number, got {value:?}"),
        ));
    }
    value
        .parse()
        .map_err(|_| Error::structure(grammar, field, format!("number {value} out of range")))
}

/// Returns true for a non-empty run of ASCII digits.
pub fn is_decimal(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if `token` is an atom or string equal to `name`,
/// ignoring case.
pub fn is_keyword(token: &Token, name: &str) -> bool {
    token
        .as_text()
        .is_some_and(|value| value.eq_ignore_ascii_case(name))
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
    fn test_required_and_optional_slots() {
        let tokens = [Token::atom("A"), Token::Nil];
        let mut cursor = Cursor::new(Grammar::Envelope, &tokens);

        assert_eq!(cursor.text("first").unwrap(), "A");
        assert_eq!(cursor.nstring("second").unwrap(), None);
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.next_optional().is_none());

        let err = cursor.next("third").unwrap_err();
        assert!(err.to_string().contains("`third`"));
        assert_eq!(err.grammar(), Some(Grammar::Envelope));
    }

    #[test]
    fn test_number() {
        let g = Grammar::Select;
        assert_eq!(number::<u32>(g, "n", &Token::atom("38361")).unwrap(), 38361);
        assert_eq!(number::<u32>(g, "n", &Token::string("7")).unwrap(), 7);
        assert!(number::<u32>(g, "n", &Token::atom("-1")).is_err());
        assert!(number::<u32>(g, "n", &Token::atom("")).is_err());
        assert!(number::<u32>(g, "n", &Token::atom("4294967296")).is_err());
        assert!(number::<u32>(g, "n", &Token::Nil).is_err());
    }

    #[test]
    fn test_number_or_nil() {
        let tokens = [Token::Nil, Token::atom("12"), Token::atom("x")];
        let mut cursor = Cursor::new(Grammar::BodyStructure, &tokens);

        assert_eq!(cursor.number_or_nil::<u64>("a").unwrap(), None);
        assert_eq!(cursor.number_or_nil::<u64>("b").unwrap(), Some(12));
        assert!(cursor.number_or_nil::<u64>("c").is_err());
    }

    #[test]
    fn test_kind_mismatch() {
        let g = Grammar::Namespace;
        let token = Token::list(vec![]);

        assert!(text(g, "prefix", &token).is_err());
        assert!(nstring(g, "prefix", &token).is_err());
        assert!(list(g, "class", &Token::Nil).is_err());
        assert_eq!(list_or_nil(g, "class", &Token::Nil).unwrap(), None);
        assert!(list_or_nil(g, "class", &Token::atom("x")).is_err());
    }

    #[test]
    fn test_is_keyword() {
        assert!(is_keyword(&Token::atom("modseq"), "MODSEQ"));
        assert!(!is_keyword(&Token::Nil, "MODSEQ"));
    }
}
