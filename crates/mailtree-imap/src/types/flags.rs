//! Message and mailbox flags.

use serde::{Deserialize, Serialize};

/// A flag from a FLAGS or PERMANENTFLAGS list.
///
/// System flags are recognized case-insensitively and serialize in their
/// canonical spelling; keywords keep the server's spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Flag {
    /// Message has been read.
    Seen,
    /// Message has been answered.
    Answered,
    /// Message is flagged for special attention.
    Flagged,
    /// Message is marked for deletion.
    Deleted,
    /// Message is a draft.
    Draft,
    /// Message is recent (first session to see it).
    Recent,
    /// `\*` in PERMANENTFLAGS: new keywords may be created.
    Wildcard,
    /// Custom keyword flag.
    Keyword(String),
}

impl Flag {
    /// Parses a flag string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "\\SEEN" => Self::Seen,
            "\\ANSWERED" => Self::Answered,
            "\\FLAGGED" => Self::Flagged,
            "\\DELETED" => Self::Deleted,
            "\\DRAFT" => Self::Draft,
            "\\RECENT" => Self::Recent,
            "\\*" => Self::Wildcard,
            _ => Self::Keyword(s.to_string()),
        }
    }

    /// Returns the flag as an IMAP string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Seen => "\\Seen",
            Self::Answered => "\\Answered",
            Self::Flagged => "\\Flagged",
            Self::Deleted => "\\Deleted",
            Self::Draft => "\\Draft",
            Self::Recent => "\\Recent",
            Self::Wildcard => "\\*",
            Self::Keyword(s) => s,
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Flag {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Flag> for String {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Keyword(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Ordered set of flags: first occurrence wins, duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Flag>", into = "Vec<Flag>")]
pub struct Flags {
    flags: Vec<Flag>,
}

impl Flags {
    /// Creates an empty flags collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { flags: Vec::new() }
    }

    /// Adds a flag unless already present.
    pub fn insert(&mut self, flag: Flag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    /// Returns true if the flag is present.
    #[must_use]
    pub fn contains(&self, flag: &Flag) -> bool {
        self.flags.contains(flag)
    }

    /// Returns true if the message has been seen.
    #[must_use]
    pub fn is_seen(&self) -> bool {
        self.contains(&Flag::Seen)
    }

    /// Returns true if new keywords may be created.
    #[must_use]
    pub fn allows_keywords(&self) -> bool {
        self.contains(&Flag::Wildcard)
    }

    /// Returns an iterator over the flags in server order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    /// Returns the number of flags.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns true if there are no flags.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Self::new();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl From<Vec<Flag>> for Flags {
    fn from(flags: Vec<Flag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<Flags> for Vec<Flag> {
    fn from(flags: Flags) -> Self {
        flags.flags
    }
}

impl IntoIterator for Flags {
    type Item = Flag;
    type IntoIter = std::vec::IntoIter<Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.into_iter()
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

    mod flag_tests {
        use super::*;

        #[test]
        fn parse_system_flags() {
            assert_eq!(Flag::parse("\\Seen"), Flag::Seen);
            assert_eq!(Flag::parse("\\SEEN"), Flag::Seen);
            assert_eq!(Flag::parse("\\answered"), Flag::Answered);
            assert_eq!(Flag::parse("\\Recent"), Flag::Recent);
        }

        #[test]
        fn parse_wildcard() {
            assert_eq!(Flag::parse("\\*"), Flag::Wildcard);
            assert_eq!(Flag::Wildcard.as_str(), "\\*");
        }

        #[test]
        fn parse_keyword() {
            let flag = Flag::parse("$Forwarded");
            assert_eq!(flag, Flag::Keyword("$Forwarded".to_string()));
            assert_eq!(flag.to_string(), "$Forwarded");
        }

        #[test]
        fn string_conversion() {
            assert_eq!(String::from(Flag::Draft), "\\Draft");
            assert_eq!(Flag::from("\\DELETED".to_string()), Flag::Deleted);
        }
    }

    mod flags_tests {
        use super::*;

        #[test]
        fn new_creates_empty() {
            let flags = Flags::new();
            assert!(flags.is_empty());
            assert_eq!(flags.len(), 0);
        }

        #[test]
        fn collect_preserves_order_and_dedupes() {
            let flags: Flags = ["\\Seen", "\\Answered", "\\SEEN", "$Junk"]
                .into_iter()
                .map(Flag::parse)
                .collect();

            let names: Vec<_> = flags.iter().map(Flag::as_str).collect();
            assert_eq!(names, vec!["\\Seen", "\\Answered", "$Junk"]);
        }

        #[test]
        fn insert_unique() {
            let mut flags = Flags::new();
            flags.insert(Flag::Seen);
            flags.insert(Flag::Seen);
            assert_eq!(flags.len(), 1);
            assert!(flags.is_seen());
        }

        #[test]
        fn allows_keywords() {
            let flags = Flags::from(vec![Flag::Deleted, Flag::Wildcard]);
            assert!(flags.allows_keywords());
            assert!(!Flags::from(vec![Flag::Deleted]).allows_keywords());
        }

        #[test]
        fn into_iter() {
            let flags = Flags::from(vec![Flag::Seen, Flag::Flagged]);
            let collected: Vec<_> = flags.into_iter().collect();
            assert_eq!(collected, vec![Flag::Seen, Flag::Flagged]);
        }
    }
}
