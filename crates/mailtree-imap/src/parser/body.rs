//! BODYSTRUCTURE parser.
//!
//! Builds the MIME tree with IMAP part numbers. A top-level multipart has
//! no part number of its own; its children are `1`, `2`, ... and the
//! children of a nested multipart extend the parent's path (`2.1`). A
//! top-level leaf is part `1`. The body embedded in a `message/rfc822`
//! part keeps that part's path, so its own children continue below it.

use mailtree_mime::decode_words;

use super::cursor::{self, Cursor};
use super::envelope::parse_envelope;
use crate::config::Limits;
use crate::tree::Token;
use crate::types::{BodyStructure, Language, Parameters};
use crate::{Error, Grammar, Result};

const G: Grammar = Grammar::BodyStructure;

/// Parses a BODYSTRUCTURE (or BODY) value.
pub fn parse_body_structure(token: &Token, limits: &Limits) -> Result<BodyStructure> {
    BodyParser { limits }.node(token, &[], 0)
}

struct BodyParser<'l> {
    limits: &'l Limits,
}

impl BodyParser<'_> {
    fn node(&self, token: &Token, path: &[usize], depth: usize) -> Result<BodyStructure> {
        if depth > self.limits.max_body_depth {
            return Err(Error::structure(
                G,
                "body",
                format!("nesting exceeds {} levels", self.limits.max_body_depth),
            ));
        }

        let items = cursor::list(G, "body", token)?;
        let node = if matches!(items.first(), Some(Token::List(_))) {
            self.multipart(items, path, depth)?
        } else {
            self.leaf(items, path, depth)?
        };

        tracing::trace!(
            part = node.part.as_deref().unwrap_or(""),
            content_type = %node.content_type,
            depth,
            "parsed body node"
        );
        Ok(node)
    }

    fn multipart(&self, items: &[Token], path: &[usize], depth: usize) -> Result<BodyStructure> {
        let mut cursor = Cursor::new(G, items);
        let mut children = Vec::new();

        while matches!(cursor.peek(), Some(Token::List(_))) {
            let child = cursor.next("body")?;
            let mut child_path = path.to_vec();
            child_path.push(children.len() + 1);
            children.push(self.node(child, &child_path, depth + 1)?);
        }

        let subtype = cursor.text("subtype")?;
        let mut node = BodyStructure {
            part: part_name(path),
            content_type: format!("multipart/{}", subtype.to_ascii_lowercase()),
            child_nodes: Some(children),
            ..BodyStructure::default()
        };

        if let Some(token) = cursor.next_optional() {
            node.parameters = parse_parameters(token, "parameters")?;
        }
        parse_trailing(&mut cursor, &mut node)?;

        Ok(node)
    }

    fn leaf(&self, items: &[Token], path: &[usize], depth: usize) -> Result<BodyStructure> {
        let path = if path.is_empty() { vec![1] } else { path.to_vec() };
        let mut cursor = Cursor::new(G, items);

        let media_type = cursor.text("type")?.to_ascii_lowercase();
        let subtype = cursor.text("subtype")?.to_ascii_lowercase();
        let mut node = BodyStructure {
            part: part_name(&path),
            content_type: format!("{media_type}/{subtype}"),
            ..BodyStructure::default()
        };

        node.parameters = parse_parameters(cursor.next("parameters")?, "parameters")?;
        node.id = cursor.nstring("id")?.map(str::to_string);
        node.description = cursor.nstring("description")?.map(decode_words);
        node.encoding = cursor.nstring("encoding")?.map(str::to_ascii_lowercase);
        node.size = cursor.number_or_nil("size")?;

        if media_type == "message" && matches!(subtype.as_str(), "rfc822" | "global") {
            let envelope = cursor.next("envelope")?;
            if !envelope.is_nil() {
                node.envelope = Some(Box::new(parse_envelope(envelope, self.limits)?));
            }
            let body = cursor.next("body")?;
            if !body.is_nil() {
                node.child_nodes = Some(vec![self.node(body, &path, depth + 1)?]);
            }
            node.lines = cursor.number_or_nil("lines")?;
        } else if media_type == "text" {
            node.lines = cursor.number_or_nil("lines")?;
        }

        if let Some(token) = cursor.next_optional() {
            node.md5 = cursor::nstring(G, "md5", token)?.map(str::to_string);
        }
        parse_trailing(&mut cursor, &mut node)?;

        Ok(node)
    }
}

fn part_name(path: &[usize]) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    let parts: Vec<String> = path.iter().map(ToString::to_string).collect();
    Some(parts.join("."))
}

/// Reads the extension fields shared by leaves and multiparts:
/// disposition, language, location. Each is optional; later unknown
/// extensions are ignored.
fn parse_trailing(cursor: &mut Cursor<'_>, node: &mut BodyStructure) -> Result<()> {
    if let Some(token) = cursor.next_optional()
        && let Some(disposition) = cursor::list_or_nil(G, "disposition", token)?
    {
        let mut disposition = Cursor::new(G, disposition);
        node.disposition = Some(disposition.text("disposition")?.to_ascii_lowercase());
        if let Some(params) = disposition.next_optional() {
            node.disposition_parameters = parse_parameters(params, "dispositionParameters")?;
        }
    }

    if let Some(token) = cursor.next_optional() {
        node.language = parse_language(token)?;
    }

    if let Some(token) = cursor.next_optional() {
        node.location = cursor::nstring(G, "location", token)?.map(str::to_string);
    }

    if cursor.remaining() > 0 {
        tracing::trace!(
            remaining = cursor.remaining(),
            "ignoring body extension data"
        );
    }

    Ok(())
}

/// Reads `(key value ...)`. Keys are lower-cased and values decoded; NIL
/// values become empty strings.
fn parse_parameters(token: &Token, field: &str) -> Result<Option<Parameters>> {
    let Some(items) = cursor::list_or_nil(G, field, token)? else {
        return Ok(None);
    };

    if items.len() % 2 != 0 {
        return Err(Error::structure(
            G,
            field,
            format!("odd number of elements ({})", items.len()),
        ));
    }

    items
        .chunks_exact(2)
        .map(|pair| {
            let key = cursor::text(G, field, &pair[0])?.to_ascii_lowercase();
            let value = cursor::nstring(G, field, &pair[1])?.map_or_else(String::new, decode_words);
            Ok((key, value))
        })
        .collect::<Result<Parameters>>()
        .map(Some)
}

fn parse_language(token: &Token) -> Result<Option<Language>> {
    match token {
        Token::Nil => Ok(None),
        Token::Atom(value) | Token::String(value) => {
            Ok(Some(Language::Single(value.to_ascii_lowercase())))
        }
        Token::List(items) => items
            .iter()
            .map(|item| cursor::text(G, "language", item).map(str::to_ascii_lowercase))
            .collect::<Result<Vec<_>>>()
            .map(|tags| Some(Language::List(tags))),
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
    use proptest::prelude::*;

    fn s(value: &str) -> Token {
        Token::string(value)
    }

    fn text_plain(lines: &str) -> Token {
        Token::list(vec![
            s("TEXT"),
            s("PLAIN"),
            Token::list(vec![s("CHARSET"), s("US-ASCII")]),
            Token::Nil,
            Token::Nil,
            s("7BIT"),
            Token::atom("1152"),
            Token::atom(lines),
        ])
    }

    fn multipart(children: Vec<Token>, subtype: &str) -> Token {
        let mut items = children;
        items.push(s(subtype));
        Token::list(items)
    }

    fn parse(token: &Token) -> Result<BodyStructure> {
        parse_body_structure(token, &Limits::default())
    }

    #[test]
    fn test_top_level_leaf_is_part_one() {
        let body = parse(&text_plain("23")).unwrap();

        assert_eq!(body.part.as_deref(), Some("1"));
        assert_eq!(body.content_type, "text/plain");
        assert_eq!(body.parameter("charset"), Some("US-ASCII"));
        assert_eq!(body.encoding.as_deref(), Some("7bit"));
        assert_eq!(body.size, Some(1152));
        assert_eq!(body.lines, Some(23));
        assert_eq!(body.md5, None);
        assert_eq!(body.child_nodes, None);
    }

    #[test]
    fn test_nested_numbering() {
        let tree = multipart(
            vec![
                text_plain("1"),
                multipart(vec![text_plain("2"), text_plain("3")], "ALTERNATIVE"),
            ],
            "MIXED",
        );
        let body = parse(&tree).unwrap();

        assert_eq!(body.part, None);
        assert_eq!(body.content_type, "multipart/mixed");
        assert_eq!(body.parameters, None);
        let parts: Vec<_> = body.walk().filter_map(|n| n.part.clone()).collect();
        assert_eq!(parts, vec!["1", "2", "2.1", "2.2"]);
        assert_eq!(body.find("2").unwrap().content_type, "multipart/alternative");
    }

    #[test]
    fn test_message_rfc822_keeps_path() {
        let envelope = Token::list(vec![Token::Nil; 10]);
        let message = Token::list(vec![
            s("MESSAGE"),
            s("RFC822"),
            Token::Nil,
            Token::Nil,
            Token::Nil,
            s("7BIT"),
            Token::atom("3000"),
            envelope,
            multipart(vec![text_plain("4"), text_plain("5")], "MIXED"),
            Token::atom("70"),
        ]);
        let body = parse(&multipart(vec![text_plain("1"), message], "MIXED")).unwrap();

        let rfc822 = body.find("2").unwrap();
        assert_eq!(rfc822.content_type, "message/rfc822");
        assert!(rfc822.envelope.is_some());
        assert_eq!(rfc822.lines, Some(70));

        let embedded = &rfc822.children()[0];
        assert_eq!(embedded.part.as_deref(), Some("2"));
        assert_eq!(embedded.content_type, "multipart/mixed");
        let inner: Vec<_> = embedded.children().iter().filter_map(|n| n.part.clone()).collect();
        assert_eq!(inner, vec!["2.1", "2.2"]);
    }

    #[test]
    fn test_extension_fields() {
        let leaf = Token::list(vec![
            s("IMAGE"),
            s("PNG"),
            Token::list(vec![s("NAME"), s("=?UTF-8?Q?gr=C3=BC=C3=9Fe.png?=")]),
            s("<img1@example>"),
            s("Logo"),
            s("BASE64"),
            Token::atom("4096"),
            s("d41d8cd98f00b204e9800998ecf8427e"),
            Token::list(vec![
                s("INLINE"),
                Token::list(vec![s("FILENAME"), Token::Nil]),
            ]),
            Token::list(vec![s("EN"), s("DE")]),
            s("http://example.com/logo.png"),
            s("future-extension"),
        ]);
        let body = parse(&leaf).unwrap();

        assert_eq!(body.parameter("name"), Some("grüße.png"));
        assert_eq!(body.id.as_deref(), Some("<img1@example>"));
        assert_eq!(body.description.as_deref(), Some("Logo"));
        assert_eq!(body.md5.as_deref(), Some("d41d8cd98f00b204e9800998ecf8427e"));
        assert_eq!(body.disposition.as_deref(), Some("inline"));
        assert_eq!(
            body.disposition_parameters.as_ref().unwrap().get("filename"),
            Some(&String::new())
        );
        assert_eq!(
            body.language,
            Some(Language::List(vec!["en".to_string(), "de".to_string()]))
        );
        assert_eq!(body.location.as_deref(), Some("http://example.com/logo.png"));
        assert_eq!(body.lines, None);
    }

    #[test]
    fn test_single_language() {
        let leaf = Token::list(vec![
            s("APPLICATION"),
            s("PDF"),
            Token::Nil,
            Token::Nil,
            Token::Nil,
            s("BASE64"),
            Token::atom("10"),
            Token::Nil,
            Token::Nil,
            s("FR"),
        ]);
        let body = parse(&leaf).unwrap();
        assert_eq!(body.language, Some(Language::Single("fr".to_string())));
        assert_eq!(body.disposition, None);
    }

    #[test]
    fn test_empty_parameter_list_is_empty_map() {
        let mut items = text_plain("1").as_list().unwrap().to_vec();
        items[2] = Token::list(vec![]);
        let body = parse(&Token::list(items)).unwrap();
        assert_eq!(body.parameters, Some(Parameters::new()));
    }

    #[test]
    fn test_odd_parameter_list() {
        let mut items = text_plain("1").as_list().unwrap().to_vec();
        items[2] = Token::list(vec![s("CHARSET")]);
        let err = parse(&Token::list(items)).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::BodyStructure));
    }

    #[test]
    fn test_text_without_lines() {
        let mut items = text_plain("1").as_list().unwrap().to_vec();
        items.pop();
        assert!(parse(&Token::list(items)).is_err());
    }

    #[test]
    fn test_non_numeric_size() {
        let mut items = text_plain("1").as_list().unwrap().to_vec();
        items[6] = s("big");
        assert!(parse(&Token::list(items)).is_err());
    }

    #[test]
    fn test_depth_limit() {
        let mut tree = text_plain("1");
        for _ in 0..5 {
            tree = multipart(vec![tree], "MIXED");
        }

        let shallow = Limits::builder().max_body_depth(4).build();
        let err = parse_body_structure(&tree, &shallow).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::BodyStructure));

        let deep = Limits::builder().max_body_depth(5).build();
        assert!(parse_body_structure(&tree, &deep).is_ok());
    }

    fn arb_body() -> impl Strategy<Value = Token> {
        let leaf = Just(text_plain("1"));
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop::collection::vec(inner, 1..4).prop_map(|children| multipart(children, "MIXED"))
        })
    }

    fn check_numbering(node: &BodyStructure) {
        for (i, child) in node.children().iter().enumerate() {
            let expected = match &node.part {
                Some(parent) => format!("{parent}.{}", i + 1),
                None => (i + 1).to_string(),
            };
            assert_eq!(child.part.as_deref(), Some(expected.as_str()));
            check_numbering(child);
        }
    }

    proptest! {
        #[test]
        fn prop_part_numbering(tree in arb_body()) {
            let first = parse(&tree).unwrap();
            let second = parse(&tree).unwrap();
            prop_assert_eq!(&first, &second);
            check_numbering(&first);
        }
    }
}
