//! Semantic response parsers.
//!
//! Each parser reads a token tree and returns typed data:
//!
//! - **NAMESPACE** → [`NamespaceSet`], or `None` without server support
//! - **SELECT/EXAMINE** → [`MailboxSelection`]
//! - **ENVELOPE** → [`Envelope`] (address lists via [`Parser::address_list`])
//! - **BODYSTRUCTURE** → [`BodyStructure`] with IMAP part numbers
//! - **FETCH** → [`MessageData`], **SEARCH** → sorted numbers
//!
//! Parsers hold no state. [`Parser`] carries the [`Limits`] applied to
//! recursive or unbounded input; the free functions use the defaults.
//!
//! # Example
//!
//! ```
//! use mailtree_imap::{ResponseReader, parser};
//!
//! let input = b"* NAMESPACE ((\"\" \"/\")) NIL NIL\r\nA1 OK done\r\n";
//! let response = ResponseReader::parse(input).unwrap();
//!
//! let namespaces = parser::parse_namespace(response.records("NAMESPACE"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(namespaces.personal.unwrap()[0].delimiter.as_deref(), Some("/"));
//! assert!(namespaces.shared.is_none());
//! ```

mod address;
mod body;
mod cursor;
mod envelope;
mod fetch;
mod namespace;
mod search;
mod select;

use crate::Result;
use crate::config::Limits;
use crate::tree::{Record, Response, Token};
use crate::types::{Address, BodyStructure, Envelope, MailboxSelection, MessageData, NamespaceSet};

/// Response parsers configured with [`Limits`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Parser {
    limits: Limits,
}

impl Parser {
    /// Creates a parser with the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limits: Limits::new(),
        }
    }

    /// Creates a parser with custom limits.
    #[must_use]
    pub const fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Returns the limits in effect.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parses the `NAMESPACE` records of a response.
    ///
    /// # Errors
    ///
    /// Returns an error unless the first record holds three classes, each
    /// NIL or a list of `(prefix delimiter)` descriptors.
    #[allow(clippy::unused_self)]
    pub fn namespace(&self, records: &[Record]) -> Result<Option<NamespaceSet>> {
        namespace::parse_namespace(records)
    }

    /// Parses a SELECT or EXAMINE response.
    ///
    /// # Errors
    ///
    /// Returns an error if EXISTS, FLAGS, UIDVALIDITY or UIDNEXT is missing
    /// or malformed, or if both HIGHESTMODSEQ and NOMODSEQ are present.
    #[allow(clippy::unused_self)]
    pub fn select(&self, response: &Response) -> Result<MailboxSelection> {
        select::parse_select(response)
    }

    /// Parses an ENVELOPE address list; `None` for NIL.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is not a 4-element list or the list is
    /// longer than [`Limits::max_addresses`].
    pub fn address_list(&self, token: &Token) -> Result<Option<Vec<Address>>> {
        address::parse_address_list(token, &self.limits)
    }

    /// Parses an ENVELOPE.
    ///
    /// # Errors
    ///
    /// Returns an error unless `token` is a 10-element list of the
    /// expected kinds.
    pub fn envelope(&self, token: &Token) -> Result<Envelope> {
        envelope::parse_envelope(token, &self.limits)
    }

    /// Parses a BODYSTRUCTURE.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed node or nesting deeper than
    /// [`Limits::max_body_depth`].
    pub fn body_structure(&self, token: &Token) -> Result<BodyStructure> {
        body::parse_body_structure(token, &self.limits)
    }

    /// Parses `FETCH` records.
    ///
    /// # Errors
    ///
    /// Returns an error if a record lacks its number or item list, or an
    /// item value is malformed.
    pub fn fetch(&self, records: &[Record]) -> Result<Vec<MessageData>> {
        fetch::parse_fetch(records, &self.limits)
    }

    /// Parses `SEARCH` records into ascending numbers.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-numeric result.
    #[allow(clippy::unused_self)]
    pub fn search(&self, records: &[Record]) -> Result<Vec<u32>> {
        search::parse_search(records)
    }
}

/// Parses `NAMESPACE` records with default limits. See [`Parser::namespace`].
///
/// # Errors
///
/// See [`Parser::namespace`].
pub fn parse_namespace(records: &[Record]) -> Result<Option<NamespaceSet>> {
    Parser::new().namespace(records)
}

/// Parses a SELECT or EXAMINE response. See [`Parser::select`].
///
/// # Errors
///
/// See [`Parser::select`].
pub fn parse_select(response: &Response) -> Result<MailboxSelection> {
    Parser::new().select(response)
}

/// Parses an address list with default limits.
///
/// # Errors
///
/// See [`Parser::address_list`].
pub fn parse_address_list(token: &Token) -> Result<Option<Vec<Address>>> {
    Parser::new().address_list(token)
}

/// Parses an ENVELOPE with default limits.
///
/// # Errors
///
/// See [`Parser::envelope`].
pub fn parse_envelope(token: &Token) -> Result<Envelope> {
    Parser::new().envelope(token)
}

/// Parses a BODYSTRUCTURE with default limits.
///
/// # Errors
///
/// See [`Parser::body_structure`].
pub fn parse_body_structure(token: &Token) -> Result<BodyStructure> {
    Parser::new().body_structure(token)
}

/// Parses `FETCH` records with default limits.
///
/// # Errors
///
/// See [`Parser::fetch`].
pub fn parse_fetch(records: &[Record]) -> Result<Vec<MessageData>> {
    Parser::new().fetch(records)
}

/// Parses `SEARCH` records.
///
/// # Errors
///
/// See [`Parser::search`].
pub fn parse_search(records: &[Record]) -> Result<Vec<u32>> {
    Parser::new().search(records)
}
