//! FETCH message data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BodyStructure, Envelope, Flags};

/// Data items returned for one message by FETCH.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    /// Message sequence number.
    #[serde(rename = "#")]
    pub seq: u32,
    /// UID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,
    /// Message flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,
    /// Mod-sequence (CONDSTORE), as decimal text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modseq: Option<String>,
    /// Envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<Envelope>,
    /// Body structure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodystructure: Option<BodyStructure>,
    /// RFC822.SIZE.
    #[serde(
        default,
        rename = "rfc822.size",
        skip_serializing_if = "Option::is_none"
    )]
    pub rfc822_size: Option<u64>,
    /// INTERNALDATE, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internaldate: Option<String>,
    /// Other items (body sections, `BINARY.SIZE`, ...) by lower-cased name.
    /// NIL values are `None`.
    #[serde(flatten)]
    pub items: BTreeMap<String, Option<String>>,
}

impl MessageData {
    /// Creates message data for a sequence number.
    #[must_use]
    pub fn new(seq: u32) -> Self {
        Self {
            seq,
            ..Self::default()
        }
    }

    /// Returns a raw item by name, case-insensitively.
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&str> {
        self.items.get(&name.to_ascii_lowercase())?.as_deref()
    }
}
