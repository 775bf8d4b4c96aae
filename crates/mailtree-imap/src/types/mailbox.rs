//! Mailbox selection state.

use serde::{Deserialize, Serialize};

use super::Flags;

/// Mailbox state reported by SELECT or EXAMINE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxSelection {
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// Flags defined for this mailbox.
    ///
    /// System flags are matched case-insensitively and reported in their
    /// RFC spelling (`\SEEN` becomes `\Seen`). Keywords keep the server's
    /// spelling. The same holds for `permanent_flags`.
    pub flags: Flags,
    /// Flags that can be permanently stored, if the server said so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_flags: Option<Flags>,
    /// UIDVALIDITY value.
    pub uid_validity: u32,
    /// Next UID to be assigned.
    pub uid_next: u32,
    /// Highest mod-sequence (CONDSTORE). Kept as decimal text because it
    /// may exceed 2^53.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_modseq: Option<String>,
    /// Whether the mailbox was opened read-only.
    pub read_only: bool,
    /// Server does not keep mod-sequences for this mailbox.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_modseq: bool,
}

impl MailboxSelection {
    /// Returns the highest mod-sequence as a number, if it fits in `u64`.
    #[must_use]
    pub fn highest_modseq_value(&self) -> Option<u64> {
        self.highest_modseq.as_deref()?.parse().ok()
    }
}
