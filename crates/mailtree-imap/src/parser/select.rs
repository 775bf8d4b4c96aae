//! SELECT/EXAMINE response parser.

use super::cursor::{self, Cursor};
use crate::tree::{Response, Token};
use crate::types::{Flag, Flags, MailboxSelection};
use crate::{Error, Grammar, Result};

const G: Grammar = Grammar::Select;

/// Parses the untagged data and tagged code of a SELECT or EXAMINE.
pub fn parse_select(response: &Response) -> Result<MailboxSelection> {
    let exists = response
        .records("EXISTS")
        .first()
        .and_then(|record| record.nr)
        .ok_or_else(|| Error::structure(G, "EXISTS", "missing"))?;

    let flags = response
        .records("FLAGS")
        .first()
        .ok_or_else(|| Error::structure(G, "FLAGS", "missing"))
        .and_then(|record| Cursor::new(G, &record.attributes).list("FLAGS"))
        .and_then(|list| parse_flags(G, "FLAGS", list))?;

    let mut permanent_flags = None;
    let mut uid_validity = None;
    let mut uid_next = None;
    let mut highest_modseq = None;
    let mut no_modseq = false;

    for code in response.records("OK").iter().filter_map(|r| r.code.as_ref()) {
        let mut args = Cursor::new(G, &code.args);
        match code.name.as_str() {
            "PERMANENTFLAGS" => {
                let list = args.list("PERMANENTFLAGS")?;
                permanent_flags = Some(parse_flags(G, "PERMANENTFLAGS", list)?);
            }
            "UIDVALIDITY" => uid_validity = Some(args.number("UIDVALIDITY")?),
            "UIDNEXT" => uid_next = Some(args.number("UIDNEXT")?),
            "HIGHESTMODSEQ" => {
                let value = args.text("HIGHESTMODSEQ")?;
                if !cursor::is_decimal(value) {
                    return Err(Error::structure(
                        G,
                        "HIGHESTMODSEQ",
                        format!("expected number, got {value:?}"),
                    ));
                }
                highest_modseq = Some(value.to_string());
            }
            "NOMODSEQ" => no_modseq = true,
            other => tracing::trace!(code = other, "ignoring response code"),
        }
    }

    if highest_modseq.is_some() && no_modseq {
        return Err(Error::structure(
            G,
            "NOMODSEQ",
            "both HIGHESTMODSEQ and NOMODSEQ present",
        ));
    }

    Ok(MailboxSelection {
        exists,
        flags,
        permanent_flags,
        uid_validity: uid_validity.ok_or_else(|| Error::structure(G, "UIDVALIDITY", "missing"))?,
        uid_next: uid_next.ok_or_else(|| Error::structure(G, "UIDNEXT", "missing"))?,
        highest_modseq,
        read_only: response.code.as_ref().is_some_and(|code| code.is("READ-ONLY")),
        no_modseq,
    })
}

/// Reads a flag list, e.g. `(\Answered \Flagged $Forwarded)`.
pub fn parse_flags(grammar: Grammar, field: &str, list: &[Token]) -> Result<Flags> {
    list.iter()
        .map(|token| cursor::text(grammar, field, token).map(Flag::parse))
        .collect()
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
    use crate::tree::{Record, ResponseCode};

    fn code(name: &str, args: Vec<Token>) -> Record {
        Record::with_code(ResponseCode::new(name, args))
    }

    fn base_response(tagged: &str) -> Response {
        let mut response = Response {
            tag: "A1".to_string(),
            command: "OK".to_string(),
            code: Some(ResponseCode::new(tagged, vec![])),
            ..Response::default()
        };
        response.push("EXISTS", Record::numbered(123, vec![]));
        response.push(
            "FLAGS",
            Record::with_attributes(vec![Token::list(vec![
                Token::atom("\\Answered"),
                Token::atom("\\Flagged"),
            ])]),
        );
        response.push(
            "OK",
            code(
                "PERMANENTFLAGS",
                vec![Token::list(vec![
                    Token::atom("\\Answered"),
                    Token::atom("\\Flagged"),
                    Token::atom("\\*"),
                ])],
            ),
        );
        response.push("OK", code("UIDVALIDITY", vec![Token::atom("2")]));
        response.push("OK", code("UIDNEXT", vec![Token::atom("38361")]));
        response
    }

    #[test]
    fn test_read_write_with_nomodseq() {
        let mut response = base_response("READ-WRITE");
        response.push("OK", code("NOMODSEQ", vec![]));

        let selection = parse_select(&response).unwrap();
        assert_eq!(selection.exists, 123);
        assert_eq!(selection.flags.len(), 2);
        assert!(selection.permanent_flags.unwrap().allows_keywords());
        assert_eq!(selection.uid_validity, 2);
        assert_eq!(selection.uid_next, 38361);
        assert!(!selection.read_only);
        assert!(selection.no_modseq);
        assert_eq!(selection.highest_modseq, None);
    }

    #[test]
    fn test_read_only_with_highest_modseq() {
        let mut response = base_response("READ-ONLY");
        response.push("OK", code("HIGHESTMODSEQ", vec![Token::atom("3682918")]));

        let selection = parse_select(&response).unwrap();
        assert!(selection.read_only);
        assert!(!selection.no_modseq);
        assert_eq!(selection.highest_modseq.as_deref(), Some("3682918"));
    }

    #[test]
    fn test_highest_modseq_beyond_u64_kept_as_text() {
        let mut response = base_response("READ-WRITE");
        response.push(
            "OK",
            code("HIGHESTMODSEQ", vec![Token::atom("123456789012345678901234")]),
        );

        let selection = parse_select(&response).unwrap();
        assert_eq!(
            selection.highest_modseq.as_deref(),
            Some("123456789012345678901234")
        );
    }

    #[test]
    fn test_neither_modseq_extension() {
        let selection = parse_select(&base_response("READ-WRITE")).unwrap();
        assert_eq!(selection.highest_modseq, None);
        assert!(!selection.no_modseq);
    }

    #[test]
    fn test_unknown_codes_ignored() {
        let mut response = base_response("READ-WRITE");
        response.push("OK", code("UNSEEN", vec![Token::atom("17")]));
        response.push("OK", code("X-GUID", vec![Token::string("abc")]));
        response.push("OK", Record::default());

        assert!(parse_select(&response).is_ok());
    }

    #[test]
    fn test_both_modseq_codes_rejected() {
        let mut response = base_response("READ-WRITE");
        response.push("OK", code("HIGHESTMODSEQ", vec![Token::atom("1")]));
        response.push("OK", code("NOMODSEQ", vec![]));

        let err = parse_select(&response).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::Select));
    }

    #[test]
    fn test_missing_mandatory_fields() {
        let mut response = base_response("READ-WRITE");
        response.payload.remove("EXISTS");
        assert!(parse_select(&response).is_err());

        let mut response = base_response("READ-WRITE");
        response.payload.remove("FLAGS");
        assert!(parse_select(&response).is_err());

        let mut response = base_response("READ-WRITE");
        response.payload.remove("OK");
        let err = parse_select(&response).unwrap_err();
        assert!(err.to_string().contains("UIDVALIDITY"));
    }

    #[test]
    fn test_non_numeric_uidnext() {
        let mut response = base_response("READ-WRITE");
        response.push("OK", code("UIDNEXT", vec![Token::atom("soon")]));
        assert!(parse_select(&response).is_err());
    }

    #[test]
    fn test_system_flags_canonical_keywords_verbatim() {
        let mut response = base_response("READ-WRITE");
        response.payload.remove("FLAGS");
        response.push(
            "FLAGS",
            Record::with_attributes(vec![Token::list(vec![
                Token::atom("\\SEEN"),
                Token::atom("\\deleted"),
                Token::atom("$MDNSent"),
            ])]),
        );

        let flags: Vec<String> = parse_select(&response)
            .unwrap()
            .flags
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(flags, vec!["\\Seen", "\\Deleted", "$MDNSent"]);
    }

    #[test]
    fn test_missing_tagged_code_is_read_write() {
        let mut response = base_response("READ-WRITE");
        response.code = None;
        assert!(!parse_select(&response).unwrap().read_only);
    }
}
