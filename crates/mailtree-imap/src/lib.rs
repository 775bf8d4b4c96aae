//! # mailtree-imap
//!
//! Typed parsers for IMAP server responses (RFC 9051 and RFC 3501).
//!
//! ## Features
//!
//! - **Token trees**: a response reader turns raw response lines into
//!   [`Token`] trees grouped by response name
//! - **NAMESPACE**: personal, other users' and shared roots, with absent
//!   classes kept distinct from empty ones (RFC 2342)
//! - **SELECT/EXAMINE**: mailbox state including CONDSTORE's
//!   `HIGHESTMODSEQ`/`NOMODSEQ`
//! - **ENVELOPE**: addresses with group markers and decoded display names
//! - **BODYSTRUCTURE**: the MIME tree with IMAP part numbers and decoded
//!   parameter values
//! - **Bounded input**: nesting and list length limits via [`Limits`]
//!
//! Parsers are pure functions; they do no I/O and keep no state.
//!
//! ## Quick Start
//!
//! ```
//! use mailtree_imap::{ResponseReader, parse_select};
//!
//! let input = b"* 172 EXISTS\r\n\
//!     * FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n\
//!     * OK [UIDVALIDITY 3857529045] UIDs valid\r\n\
//!     * OK [UIDNEXT 4392] Predicted next UID\r\n\
//!     A142 OK [READ-WRITE] SELECT completed\r\n";
//!
//! let response = ResponseReader::parse(input).unwrap();
//! let mailbox = parse_select(&response).unwrap();
//!
//! assert_eq!(mailbox.exists, 172);
//! assert_eq!(mailbox.uid_next, 4392);
//! assert!(!mailbox.read_only);
//! ```
//!
//! ## Modules
//!
//! - [`tree`]: Token trees and the response reader
//! - [`parser`]: Semantic parsers
//! - [`types`]: Parser output (flags, envelopes, body structures, etc.)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
pub mod parser;
pub mod tree;
pub mod types;

pub use config::{DEFAULT_MAX_ADDRESSES, DEFAULT_MAX_BODY_DEPTH, Limits, LimitsBuilder};
pub use error::{Error, Grammar, Result};
pub use parser::{
    Parser, parse_address_list, parse_body_structure, parse_envelope, parse_fetch,
    parse_namespace, parse_search, parse_select,
};
pub use tree::{Line, Record, Response, ResponseCode, ResponseReader, Token, TokenKind};
pub use types::{
    Address, BodyStructure, Envelope, Flag, Flags, Language, MailboxSelection, MessageData,
    Namespace, NamespaceSet, Parameters,
};
