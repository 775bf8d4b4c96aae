//! Generic IMAP token trees.
//!
//! Every semantic parser in this crate reads the same representation: a
//! tree of [`Token`]s grouped into untagged [`Record`]s, collected per
//! command into a [`Response`]. The [`reader`] module builds these from
//! raw response bytes; callers with their own lexer can construct them
//! directly.

pub mod lexer;
pub mod reader;

use std::collections::BTreeMap;

pub use reader::{Line, ResponseReader};

/// Kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unquoted atom.
    Atom,
    /// Quoted string or literal.
    String,
    /// Parenthesized list.
    List,
    /// `NIL`.
    Nil,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Atom => "ATOM",
            Self::String => "STRING",
            Self::List => "LIST",
            Self::Nil => "NIL",
        })
    }
}

/// One element of an IMAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unquoted atom, including numbers and flags.
    Atom(String),
    /// Quoted string or literal.
    String(String),
    /// Parenthesized list.
    List(Vec<Token>),
    /// `NIL`, an absent value.
    Nil,
}

impl Token {
    /// Creates an atom token.
    #[must_use]
    pub fn atom(value: impl Into<String>) -> Self {
        Self::Atom(value.into())
    }

    /// Creates a string token.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Creates a list token.
    #[must_use]
    pub const fn list(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Atom(_) => TokenKind::Atom,
            Self::String(_) => TokenKind::String,
            Self::List(_) => TokenKind::List,
            Self::Nil => TokenKind::Nil,
        }
    }

    /// Returns the text of an atom or string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Atom(s) | Self::String(s) => Some(s),
            Self::List(_) | Self::Nil => None,
        }
    }

    /// Returns the items of a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true for `NIL`.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }
}

/// Bracketed response code, e.g. `[UIDVALIDITY 3857529045]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCode {
    /// Upper-cased code name.
    pub name: String,
    /// Tokens following the name.
    pub args: Vec<Token>,
}

impl ResponseCode {
    /// Creates a response code.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Token>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            args,
        }
    }

    /// Returns true if the code has the given name (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One untagged response line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Leading number, as in `* 23 EXISTS` or `* 4 FETCH (...)`.
    pub nr: Option<u32>,
    /// Response code of status responses (`* OK [...] text`).
    pub code: Option<ResponseCode>,
    /// Tokens after the response name.
    pub attributes: Vec<Token>,
    /// Human-readable text of status responses.
    pub text: Option<String>,
}

impl Record {
    /// Creates a record holding only attributes.
    #[must_use]
    pub fn with_attributes(attributes: Vec<Token>) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Creates a numbered record such as `* 23 EXISTS`.
    #[must_use]
    pub fn numbered(nr: u32, attributes: Vec<Token>) -> Self {
        Self {
            nr: Some(nr),
            attributes,
            ..Self::default()
        }
    }

    /// Creates a status record carrying a response code.
    #[must_use]
    pub fn with_code(code: ResponseCode) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }
}

/// Untagged records of one command, keyed by upper-cased response name.
pub type Payload = BTreeMap<String, Vec<Record>>;

/// A completed command: its tagged status line plus the untagged data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Command tag.
    pub tag: String,
    /// Tagged status (`OK`, `NO`, `BAD`).
    pub command: String,
    /// Response code of the tagged line, e.g. `READ-WRITE`.
    pub code: Option<ResponseCode>,
    /// Human-readable text of the tagged line.
    pub text: Option<String>,
    /// Untagged records by response name.
    pub payload: Payload,
}

impl Response {
    /// Returns the records of one response name, empty if none arrived.
    #[must_use]
    pub fn records(&self, name: &str) -> &[Record] {
        self.payload
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends an untagged record under `name`.
    pub fn push(&mut self, name: &str, record: Record) {
        self.payload
            .entry(name.to_ascii_uppercase())
            .or_default()
            .push(record);
    }

    /// Returns the name of the tagged response code, if any.
    #[must_use]
    pub fn code_name(&self) -> Option<&str> {
        self.code.as_ref().map(|code| code.name.as_str())
    }
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
    fn test_token_accessors() {
        assert_eq!(Token::atom("X").as_text(), Some("X"));
        assert_eq!(Token::string("").as_text(), Some(""));
        assert_eq!(Token::Nil.as_text(), None);
        assert!(Token::Nil.is_nil());
        assert_eq!(Token::list(vec![Token::Nil]).as_list().unwrap().len(), 1);
        assert!(Token::atom("X").as_list().is_none());
    }

    #[test]
    fn test_token_kind() {
        assert_eq!(Token::atom("1").kind(), TokenKind::Atom);
        assert_eq!(Token::string("1").kind(), TokenKind::String);
        assert_eq!(Token::list(vec![]).kind(), TokenKind::List);
        assert_eq!(Token::Nil.kind(), TokenKind::Nil);
        assert_eq!(TokenKind::List.to_string(), "LIST");
    }

    #[test]
    fn test_response_records() {
        let mut response = Response::default();
        response.push("exists", Record::numbered(3, vec![]));

        assert_eq!(response.records("EXISTS").len(), 1);
        assert_eq!(response.records("exists")[0].nr, Some(3));
        assert!(response.records("FLAGS").is_empty());
    }

    #[test]
    fn test_response_code_name() {
        let code = ResponseCode::new("read-only", vec![]);
        assert_eq!(code.name, "READ-ONLY");
        assert!(code.is("Read-Only"));
    }
}
