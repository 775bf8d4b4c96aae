//! Typed parser output.
//!
//! Every type serializes to the camelCase JSON shape higher layers
//! consume (`uidValidity`, `childNodes`, `dispositionParameters`, ...).

mod body;
mod envelope;
mod flags;
mod mailbox;
mod message;
mod namespace;

pub use body::{BodyStructure, Language, Parameters};
pub use envelope::{Address, Envelope};
pub use flags::{Flag, Flags};
pub use mailbox::MailboxSelection;
pub use message::MessageData;
pub use namespace::{Namespace, NamespaceSet};

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
    use serde_json::json;

    #[test]
    fn test_namespace_set_json() {
        let set = NamespaceSet {
            personal: Some(vec![Namespace::new("INBOX.", Some("."))]),
            users: None,
            shared: Some(vec![]),
        };

        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(
            value,
            json!({
                "personal": [{"prefix": "INBOX.", "delimiter": "."}],
                "users": false,
                "shared": []
            })
        );

        let back: NamespaceSet = serde_json::from_value(value).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_namespace_rejects_true() {
        let result: Result<NamespaceSet, _> =
            serde_json::from_value(json!({"personal": true, "users": false, "shared": false}));
        assert!(result.is_err());
    }

    #[test]
    fn test_selection_json_skips_absent() {
        let selection = MailboxSelection {
            exists: 1,
            flags: Flags::from(vec![Flag::Seen]),
            permanent_flags: None,
            uid_validity: 2,
            uid_next: 3,
            highest_modseq: None,
            read_only: true,
            no_modseq: false,
        };

        assert_eq!(
            serde_json::to_value(&selection).unwrap(),
            json!({
                "exists": 1,
                "flags": ["\\Seen"],
                "uidValidity": 2,
                "uidNext": 3,
                "readOnly": true
            })
        );
    }

    #[test]
    fn test_highest_modseq_value() {
        let mut selection: MailboxSelection = serde_json::from_value(json!({
            "exists": 0, "flags": [], "uidValidity": 1, "uidNext": 1,
            "readOnly": false, "highestModseq": "18446744073709551615"
        }))
        .unwrap();
        assert_eq!(selection.highest_modseq_value(), Some(u64::MAX));

        selection.highest_modseq = Some("18446744073709551616".to_string());
        assert_eq!(selection.highest_modseq_value(), None);
    }

    #[test]
    fn test_envelope_json_keeps_nulls() {
        let value = serde_json::to_value(Envelope::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "date": null, "subject": null, "from": null, "sender": null,
                "replyTo": null, "to": null, "cc": null, "bcc": null,
                "inReplyTo": null, "messageId": null
            })
        );
    }

    #[test]
    fn test_message_data_json() {
        let mut message = MessageData::new(4);
        message.uid = Some(10);
        message.rfc822_size = Some(120);
        message
            .items
            .insert("body[header.fields (subject)]".to_string(), Some("Subject: x".to_string()));

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "#": 4,
                "uid": 10,
                "rfc822.size": 120,
                "body[header.fields (subject)]": "Subject: x"
            })
        );
        assert_eq!(message.item("BODY[HEADER.FIELDS (SUBJECT)]"), Some("Subject: x"));
    }
}
