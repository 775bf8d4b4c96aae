//! ENVELOPE types.

use serde::{Deserialize, Serialize};

/// One entry of an ENVELOPE address list.
///
/// Group syntax uses IMAP's native markers: a group start has no host and
/// the group name in `mailbox`; a group end has neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Display name, decoded.
    pub name: Option<String>,
    /// Obsolete source route (`adl`).
    pub source_route: Option<String>,
    /// Local part, or the group name of a group start.
    pub mailbox: Option<String>,
    /// Domain.
    pub host: Option<String>,
}

impl Address {
    /// Returns true for a group start marker.
    #[must_use]
    pub const fn is_group_start(&self) -> bool {
        self.host.is_none() && self.mailbox.is_some()
    }

    /// Returns true for a group end marker.
    #[must_use]
    pub const fn is_group_end(&self) -> bool {
        self.host.is_none() && self.mailbox.is_none()
    }

    /// Returns `mailbox@host` for ordinary addresses.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        match (&self.mailbox, &self.host) {
            (Some(mailbox), Some(host)) => Some(format!("{mailbox}@{host}")),
            _ => None,
        }
    }
}

/// Parsed ENVELOPE structure. Every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Date header, verbatim.
    pub date: Option<String>,
    /// Subject header, decoded.
    pub subject: Option<String>,
    /// From addresses.
    pub from: Option<Vec<Address>>,
    /// Sender addresses.
    pub sender: Option<Vec<Address>>,
    /// Reply-To addresses.
    pub reply_to: Option<Vec<Address>>,
    /// To addresses.
    pub to: Option<Vec<Address>>,
    /// Cc addresses.
    pub cc: Option<Vec<Address>>,
    /// Bcc addresses.
    pub bcc: Option<Vec<Address>>,
    /// In-Reply-To header, verbatim.
    pub in_reply_to: Option<String>,
    /// Message-ID header, verbatim.
    pub message_id: Option<String>,
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
    fn test_group_markers() {
        let start = Address {
            mailbox: Some("team".to_string()),
            ..Address::default()
        };
        let end = Address::default();

        assert!(start.is_group_start());
        assert!(!start.is_group_end());
        assert!(end.is_group_end());
        assert_eq!(start.email(), None);
    }

    #[test]
    fn test_email() {
        let address = Address {
            mailbox: Some("joe".to_string()),
            host: Some("example.com".to_string()),
            ..Address::default()
        };
        assert_eq!(address.email().as_deref(), Some("joe@example.com"));
    }
}
