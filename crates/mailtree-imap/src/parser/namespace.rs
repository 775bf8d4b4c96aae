//! NAMESPACE response parser (RFC 2342).

use super::cursor::{self, Cursor};
use crate::tree::{Record, Token};
use crate::types::{Namespace, NamespaceSet};
use crate::{Error, Grammar, Result};

const G: Grammar = Grammar::Namespace;

/// Parses the `NAMESPACE` records of a response.
///
/// Returns `None` when no NAMESPACE data arrived, i.e. the server does not
/// support the extension.
pub fn parse_namespace(records: &[Record]) -> Result<Option<NamespaceSet>> {
    let Some(record) = records.first() else {
        return Ok(None);
    };

    let classes = &record.attributes;
    if classes.len() != 3 {
        return Err(Error::structure(
            G,
            "namespaces",
            format!("expected 3 classes, got {}", classes.len()),
        ));
    }

    let mut cursor = Cursor::new(G, classes);
    Ok(Some(NamespaceSet {
        personal: parse_class(&mut cursor, "personal")?,
        users: parse_class(&mut cursor, "users")?,
        shared: parse_class(&mut cursor, "shared")?,
    }))
}

fn parse_class(cursor: &mut Cursor<'_>, field: &str) -> Result<Option<Vec<Namespace>>> {
    let Some(descriptors) = cursor.list_or_nil(field)? else {
        return Ok(None);
    };

    descriptors
        .iter()
        .map(|descriptor| parse_descriptor(descriptor, field))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Reads `(prefix delimiter *extension)`; extensions are ignored.
fn parse_descriptor(token: &Token, field: &str) -> Result<Namespace> {
    let mut descriptor = Cursor::new(G, cursor::list(G, field, token)?);
    let prefix = descriptor.text(field)?;
    let delimiter = descriptor.nstring(field)?;

    Ok(Namespace::new(prefix, delimiter))
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

    fn descriptor(prefix: &str, delimiter: Option<&str>) -> Token {
        Token::list(vec![
            Token::string(prefix),
            delimiter.map_or(Token::Nil, Token::string),
        ])
    }

    #[test]
    fn test_no_records_is_unsupported() {
        assert_eq!(parse_namespace(&[]).unwrap(), None);
    }

    #[test]
    fn test_personal_only() {
        let record = Record::with_attributes(vec![
            Token::list(vec![descriptor("INBOX.", Some("."))]),
            Token::Nil,
            Token::Nil,
        ]);

        let set = parse_namespace(&[record]).unwrap().unwrap();
        assert_eq!(set.personal, Some(vec![Namespace::new("INBOX.", Some("."))]));
        assert_eq!(set.users, None);
        assert_eq!(set.shared, None);
    }

    #[test]
    fn test_empty_prefix_and_nil_delimiter() {
        let record = Record::with_attributes(vec![
            Token::list(vec![descriptor("", None)]),
            Token::list(vec![descriptor("~", Some("/"))]),
            Token::list(vec![
                descriptor("#shared/", Some("/")),
                descriptor("#public/", Some("/")),
            ]),
        ]);

        let set = parse_namespace(&[record]).unwrap().unwrap();
        assert_eq!(set.personal, Some(vec![Namespace::new("", None)]));
        assert_eq!(set.users, Some(vec![Namespace::new("~", Some("/"))]));
        let shared: Vec<_> = set.shared.unwrap().into_iter().map(|ns| ns.prefix).collect();
        assert_eq!(shared, vec!["#shared/", "#public/"]);
    }

    #[test]
    fn test_extensions_ignored() {
        let record = Record::with_attributes(vec![
            Token::list(vec![Token::list(vec![
                Token::string(""),
                Token::string("/"),
                Token::string("X-PARAM"),
                Token::list(vec![Token::string("FLAG1")]),
            ])]),
            Token::Nil,
            Token::Nil,
        ]);

        let set = parse_namespace(&[record]).unwrap().unwrap();
        assert_eq!(set.personal, Some(vec![Namespace::new("", Some("/"))]));
    }

    #[test]
    fn test_wrong_arity() {
        let record = Record::with_attributes(vec![Token::Nil, Token::Nil]);
        let err = parse_namespace(&[record]).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::Namespace));
    }

    #[test]
    fn test_descriptor_not_a_list() {
        let record = Record::with_attributes(vec![
            Token::list(vec![Token::string("INBOX.")]),
            Token::Nil,
            Token::Nil,
        ]);
        assert!(parse_namespace(&[record]).is_err());
    }
}
