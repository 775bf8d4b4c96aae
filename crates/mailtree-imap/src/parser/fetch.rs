//! FETCH response parser.

use super::body::parse_body_structure;
use super::cursor;
use super::envelope::parse_envelope;
use super::select::parse_flags;
use crate::config::Limits;
use crate::tree::{Record, Token};
use crate::types::MessageData;
use crate::{Error, Grammar, Result};

const G: Grammar = Grammar::Fetch;

/// Parses `FETCH` records into message data, in server order.
pub fn parse_fetch(records: &[Record], limits: &Limits) -> Result<Vec<MessageData>> {
    records
        .iter()
        .map(|record| parse_message(record, limits))
        .collect()
}

fn parse_message(record: &Record, limits: &Limits) -> Result<MessageData> {
    let seq = record
        .nr
        .ok_or_else(|| Error::structure(G, "#", "missing sequence number"))?;

    let [Token::List(items)] = record.attributes.as_slice() else {
        return Err(Error::structure(G, "items", "expected one item list"));
    };
    if items.len() % 2 != 0 {
        return Err(Error::structure(
            G,
            "items",
            format!("odd number of elements ({})", items.len()),
        ));
    }

    let mut message = MessageData::new(seq);

    for pair in items.chunks_exact(2) {
        let name = cursor::text(G, "item", &pair[0])?.to_ascii_lowercase();
        let value = &pair[1];

        match name.as_str() {
            "uid" => message.uid = Some(cursor::number(G, "uid", value)?),
            "flags" => {
                let list = cursor::list(G, "flags", value)?;
                message.flags = Some(parse_flags(G, "flags", list)?);
            }
            "modseq" => message.modseq = Some(parse_modseq(value)?),
            "envelope" => message.envelope = Some(parse_envelope(value, limits)?),
            "bodystructure" => {
                message.bodystructure = Some(parse_body_structure(value, limits)?);
            }
            // BODY without a section is the non-extensible BODYSTRUCTURE.
            "body" if value.as_list().is_some() => {
                message.bodystructure = Some(parse_body_structure(value, limits)?);
            }
            "rfc822.size" => message.rfc822_size = Some(cursor::number(G, "rfc822.size", value)?),
            "internaldate" => {
                message.internaldate = Some(cursor::text(G, "internaldate", value)?.to_string());
            }
            _ => {
                let text = cursor::nstring(G, &name, value)?.map(str::to_string);
                message.items.insert(name, text);
            }
        }
    }

    Ok(message)
}

/// Reads `(modseq)`.
fn parse_modseq(token: &Token) -> Result<String> {
    let [value] = cursor::list(G, "modseq", token)? else {
        return Err(Error::structure(G, "modseq", "expected one value"));
    };
    let value = cursor::text(G, "modseq", value)?;
    if !cursor::is_decimal(value) {
        return Err(Error::structure(
            G,
            "modseq",
            format!("expected number, got {value:?}"),
        ));
    }
    Ok(value.to_string())
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
    use crate::types::Flag;

    fn fetch(nr: u32, items: Vec<Token>) -> Record {
        Record::numbered(nr, vec![Token::list(items)])
    }

    #[test]
    fn test_parse_fetch_items() {
        let record = fetch(
            12,
            vec![
                Token::atom("UID"),
                Token::atom("4827313"),
                Token::atom("FLAGS"),
                Token::list(vec![Token::atom("\\Seen"), Token::atom("$Forwarded")]),
                Token::atom("MODSEQ"),
                Token::list(vec![Token::atom("624140003")]),
                Token::atom("RFC822.SIZE"),
                Token::atom("44827"),
                Token::atom("INTERNALDATE"),
                Token::string("17-Jul-1996 02:44:25 -0700"),
                Token::atom("BODY[HEADER.FIELDS (SUBJECT)]"),
                Token::string("Subject: hi\r\n\r\n"),
                Token::atom("BODY[TEXT]"),
                Token::Nil,
            ],
        );

        let messages = parse_fetch(&[record], &Limits::default()).unwrap();
        let message = &messages[0];

        assert_eq!(message.seq, 12);
        assert_eq!(message.uid, Some(4827313));
        let flags = message.flags.as_ref().unwrap();
        assert!(flags.is_seen());
        assert!(flags.contains(&Flag::Keyword("$Forwarded".to_string())));
        assert_eq!(message.modseq.as_deref(), Some("624140003"));
        assert_eq!(message.rfc822_size, Some(44827));
        assert_eq!(
            message.internaldate.as_deref(),
            Some("17-Jul-1996 02:44:25 -0700")
        );
        assert_eq!(
            message.item("body[header.fields (subject)]"),
            Some("Subject: hi\r\n\r\n")
        );
        assert_eq!(message.items.get("body[text]"), Some(&None));
    }

    #[test]
    fn test_body_without_section_is_structure() {
        let record = fetch(
            1,
            vec![
                Token::atom("BODY"),
                Token::list(vec![
                    Token::string("TEXT"),
                    Token::string("PLAIN"),
                    Token::Nil,
                    Token::Nil,
                    Token::Nil,
                    Token::string("7BIT"),
                    Token::atom("10"),
                    Token::atom("1"),
                ]),
            ],
        );

        let messages = parse_fetch(&[record], &Limits::default()).unwrap();
        let body = messages[0].bodystructure.as_ref().unwrap();
        assert_eq!(body.content_type, "text/plain");
    }

    #[test]
    fn test_server_order_kept() {
        let records = [
            fetch(3, vec![Token::atom("UID"), Token::atom("30")]),
            fetch(1, vec![Token::atom("UID"), Token::atom("10")]),
        ];
        let seqs: Vec<_> = parse_fetch(&records, &Limits::default())
            .unwrap()
            .into_iter()
            .map(|m| m.seq)
            .collect();
        assert_eq!(seqs, vec![3, 1]);
    }

    #[test]
    fn test_odd_item_list() {
        let record = fetch(1, vec![Token::atom("UID")]);
        let err = parse_fetch(&[record], &Limits::default()).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::Fetch));
    }

    #[test]
    fn test_unknown_item_with_list_value() {
        let record = fetch(
            1,
            vec![Token::atom("X-THING"), Token::list(vec![Token::atom("1")])],
        );
        assert!(parse_fetch(&[record], &Limits::default()).is_err());
    }

    #[test]
    fn test_missing_sequence_number() {
        let record = Record::with_attributes(vec![Token::list(vec![])]);
        assert!(parse_fetch(&[record], &Limits::default()).is_err());
    }

    #[test]
    fn test_bad_modseq() {
        let record = fetch(
            1,
            vec![Token::atom("MODSEQ"), Token::list(vec![Token::atom("x")])],
        );
        assert!(parse_fetch(&[record], &Limits::default()).is_err());
    }
}
