//! Error types for the IMAP response parsers.

use thiserror::Error;

/// Response grammar a structural error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// NAMESPACE response (RFC 2342).
    Namespace,
    /// SELECT/EXAMINE response.
    Select,
    /// ENVELOPE address list.
    Address,
    /// ENVELOPE structure.
    Envelope,
    /// BODYSTRUCTURE tree.
    BodyStructure,
    /// FETCH message data.
    Fetch,
    /// SEARCH result.
    Search,
}

impl Grammar {
    /// Returns the IMAP keyword of the grammar.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "NAMESPACE",
            Self::Select => "SELECT",
            Self::Address => "ADDRESS",
            Self::Envelope => "ENVELOPE",
            Self::BodyStructure => "BODYSTRUCTURE",
            Self::Fetch => "FETCH",
            Self::Search => "SEARCH",
        }
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while reading or interpreting IMAP responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Raw response bytes could not be tokenized.
    #[error("Protocol error at position {position}: {message}")]
    Parse {
        /// Byte position where the error occurred.
        position: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// Token tree does not have the shape the grammar requires.
    #[error("Malformed {grammar} response, field `{field}`: {message}")]
    Structure {
        /// Grammar being parsed.
        grammar: Grammar,
        /// Offending field or slot.
        field: String,
        /// Description of what went wrong.
        message: String,
    },
}

impl Error {
    /// Creates a structural error and logs it.
    pub(crate) fn structure(
        grammar: Grammar,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let message = message.into();
        tracing::debug!(%grammar, field = %field, message = %message, "malformed response");
        Self::Structure {
            grammar,
            field,
            message,
        }
    }

    /// Returns the grammar of a structural error.
    #[must_use]
    pub const fn grammar(&self) -> Option<Grammar> {
        match self {
            Self::Structure { grammar, .. } => Some(*grammar),
            Self::Parse { .. } => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

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
    fn test_structure_display() {
        let err = Error::structure(Grammar::Envelope, "subject", "expected string");
        assert_eq!(
            err.to_string(),
            "Malformed ENVELOPE response, field `subject`: expected string"
        );
        assert_eq!(err.grammar(), Some(Grammar::Envelope));
    }

    #[test]
    fn test_parse_display() {
        let err = Error::Parse {
            position: 7,
            message: "Unexpected EOF".to_string(),
        };
        assert_eq!(err.to_string(), "Protocol error at position 7: Unexpected EOF");
        assert_eq!(err.grammar(), None);
    }
}
