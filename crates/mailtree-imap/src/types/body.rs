//! BODYSTRUCTURE types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Envelope;

/// Parameter map with lower-cased keys and decoded values.
pub type Parameters = BTreeMap<String, String>;

/// Body language: a single tag or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Language {
    /// One language tag.
    Single(String),
    /// Several language tags in server order.
    List(Vec<String>),
}

/// One node of a MIME tree.
///
/// Optional fields are `None` when the server sent NIL or omitted the
/// trailing extension data, and are left out of serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyStructure {
    /// Dotted part path. Absent on a top-level multipart, which cannot be
    /// fetched as a section of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
    /// Lower-case `type/subtype`.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Content-Type parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    /// Content-ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Content-Description, decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lower-case Content-Transfer-Encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Size in octets of the encoded body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Line count of `text/*` and `message/rfc822` bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<u64>,
    /// Content-MD5, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    /// Lower-case disposition type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    /// Disposition parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition_parameters: Option<Parameters>,
    /// Content-Language, lower-cased.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    /// Content-Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Envelope of an embedded `message/rfc822`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<Box<Envelope>>,
    /// Children of a multipart, or the body of an embedded message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_nodes: Option<Vec<BodyStructure>>,
}

impl BodyStructure {
    /// Returns true for `multipart/*` nodes.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type.starts_with("multipart/")
    }

    /// Returns a Content-Type parameter by lower-case name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.as_ref()?.get(name).map(String::as_str)
    }

    /// Returns the attachment file name, from the disposition `filename`
    /// or the Content-Type `name` parameter.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.disposition_parameters
            .as_ref()
            .and_then(|params| params.get("filename"))
            .map(String::as_str)
            .or_else(|| self.parameter("name"))
    }

    /// Returns the child nodes, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.child_nodes.as_deref().unwrap_or_default()
    }

    /// Visits this node and every descendant depth-first, in document order.
    pub fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }

    /// Finds the node with the given part path.
    #[must_use]
    pub fn find(&self, part: &str) -> Option<&Self> {
        self.walk().find(|node| node.part.as_deref() == Some(part))
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

    fn leaf(part: &str, content_type: &str) -> BodyStructure {
        BodyStructure {
            part: Some(part.to_string()),
            content_type: content_type.to_string(),
            ..BodyStructure::default()
        }
    }

    #[test]
    fn test_walk_order() {
        let tree = BodyStructure {
            content_type: "multipart/mixed".to_string(),
            child_nodes: Some(vec![
                BodyStructure {
                    part: Some("1".to_string()),
                    content_type: "multipart/alternative".to_string(),
                    child_nodes: Some(vec![leaf("1.1", "text/plain"), leaf("1.2", "text/html")]),
                    ..BodyStructure::default()
                },
                leaf("2", "image/png"),
            ]),
            ..BodyStructure::default()
        };

        let parts: Vec<_> = tree.walk().filter_map(|n| n.part.as_deref()).collect();
        assert_eq!(parts, vec!["1", "1.1", "1.2", "2"]);
        assert_eq!(tree.find("1.2").unwrap().content_type, "text/html");
        assert!(tree.find("3").is_none());
        assert!(tree.is_multipart());
    }

    #[test]
    fn test_filename_fallback() {
        let mut node = leaf("1", "application/pdf");
        node.parameters = Some(Parameters::from([("name".to_string(), "a.pdf".to_string())]));
        assert_eq!(node.filename(), Some("a.pdf"));

        node.disposition_parameters =
            Some(Parameters::from([("filename".to_string(), "b.pdf".to_string())]));
        assert_eq!(node.filename(), Some("b.pdf"));
    }
}
