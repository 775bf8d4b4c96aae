//! Namespace types (RFC 2342).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One namespace root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Mailbox name prefix, possibly empty.
    pub prefix: String,
    /// Hierarchy delimiter, `None` for a flat namespace.
    pub delimiter: Option<String>,
}

impl Namespace {
    /// Creates a namespace.
    #[must_use]
    pub fn new(prefix: impl Into<String>, delimiter: Option<&str>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: delimiter.map(str::to_string),
        }
    }
}

/// Namespaces of the three classes.
///
/// `None` means the server does not offer the class at all, which is not
/// the same as an empty list. It serializes as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSet {
    /// Personal namespaces.
    #[serde(with = "absent_as_false")]
    pub personal: Option<Vec<Namespace>>,
    /// Other users' namespaces.
    #[serde(with = "absent_as_false")]
    pub users: Option<Vec<Namespace>>,
    /// Shared namespaces.
    #[serde(with = "absent_as_false")]
    pub shared: Option<Vec<Namespace>>,
}

mod absent_as_false {
    use super::{Deserialize, Deserializer, Namespace, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Class {
        List(Vec<Namespace>),
        Flag(bool),
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<Vec<Namespace>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(list) => list.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<Namespace>>, D::Error> {
        match Class::deserialize(deserializer)? {
            Class::List(list) => Ok(Some(list)),
            Class::Flag(false) => Ok(None),
            Class::Flag(true) => Err(serde::de::Error::custom(
                "namespace class must be a list or false",
            )),
        }
    }
}
