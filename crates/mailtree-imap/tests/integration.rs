//! Integration tests: raw server responses through the reader and parsers.
//!
//! Expected values are compared as JSON, the shape higher layers consume.

#![allow(clippy::unwrap_used)]

use mailtree_imap::{
    Grammar, Limits, Parser, Response, ResponseReader, parse_fetch, parse_namespace,
    parse_search, parse_select,
};
use serde_json::json;

/// Reads a response written with `\n` line ends.
fn read(lines: &str) -> Response {
    ResponseReader::parse(lines.replace('\n', "\r\n").as_bytes()).unwrap()
}

#[test]
fn test_namespace_personal_only() {
    let response = read("* NAMESPACE ((\"INBOX.\" \".\")) NIL NIL\nA1 OK Namespace completed\n");
    let set = parse_namespace(response.records("NAMESPACE")).unwrap().unwrap();

    assert_eq!(
        serde_json::to_value(&set).unwrap(),
        json!({
            "personal": [{"prefix": "INBOX.", "delimiter": "."}],
            "users": false,
            "shared": false
        })
    );
}

#[test]
fn test_namespace_all_classes() {
    let response = read(
        "* NAMESPACE ((\"\" \"/\")) ((\"~\" \"/\")) ((\"#shared/\" \"/\") (\"#public/\" NIL))\n\
         A1 OK done\n",
    );
    let set = parse_namespace(response.records("NAMESPACE")).unwrap().unwrap();

    assert_eq!(
        serde_json::to_value(&set).unwrap(),
        json!({
            "personal": [{"prefix": "", "delimiter": "/"}],
            "users": [{"prefix": "~", "delimiter": "/"}],
            "shared": [
                {"prefix": "#shared/", "delimiter": "/"},
                {"prefix": "#public/", "delimiter": null}
            ]
        })
    );
}

#[test]
fn test_namespace_unsupported() {
    let response = read("A1 BAD Unknown command\n");
    assert_eq!(parse_namespace(response.records("NAMESPACE")).unwrap(), None);
}

#[test]
fn test_select_read_write_nomodseq() {
    let response = read(
        "* 123 EXISTS\n\
         * FLAGS (\\Answered \\Flagged)\n\
         * OK [PERMANENTFLAGS (\\Answered \\Flagged \\*)] Flags permitted.\n\
         * OK [UIDVALIDITY 2] UIDs valid\n\
         * OK [UIDNEXT 38361] Predicted next UID\n\
         * OK [NOMODSEQ] Sorry, this mailbox format doesn't support modsequences\n\
         A1 OK [READ-WRITE] Select completed.\n",
    );
    let selection = parse_select(&response).unwrap();

    assert_eq!(
        serde_json::to_value(&selection).unwrap(),
        json!({
            "exists": 123,
            "flags": ["\\Answered", "\\Flagged"],
            "permanentFlags": ["\\Answered", "\\Flagged", "\\*"],
            "uidValidity": 2,
            "uidNext": 38361,
            "readOnly": false,
            "noModseq": true
        })
    );
}

#[test]
fn test_examine_highest_modseq() {
    let response = read(
        "* FLAGS (\\Seen $Junk)\n\
         * 0 EXISTS\n\
         * 0 RECENT\n\
         * OK [UIDVALIDITY 1410508521] Ok\n\
         * OK [UIDNEXT 1] Ok\n\
         * OK [HIGHESTMODSEQ 18446744073709551617] Ok\n\
         A2 OK [READ-ONLY] Examine completed\n",
    );
    let selection = parse_select(&response).unwrap();

    assert_eq!(
        serde_json::to_value(&selection).unwrap(),
        json!({
            "exists": 0,
            "flags": ["\\Seen", "$Junk"],
            "uidValidity": 1410508521,
            "uidNext": 1,
            "highestModseq": "18446744073709551617",
            "readOnly": true
        })
    );
}

#[test]
fn test_select_missing_uidvalidity() {
    let response = read("* 1 EXISTS\n* FLAGS ()\n* OK [UIDNEXT 2] Ok\nA1 OK done\n");
    let err = parse_select(&response).unwrap_err();
    assert_eq!(err.grammar(), Some(Grammar::Select));
}

#[test]
fn test_fetch_envelope() {
    let response = read(
        "* 4 FETCH (UID 71 ENVELOPE (\"Mon, 7 Feb 1994 21:52:25 -0800\" \
         \"=?utf-8?Q?caf=C3=A9?= =?utf-8?Q?_menu?=\" \
         ((\"=?ISO-8859-1?Q?Andr=E9?= Pirard\" NIL \"PIRARD\" \"vm1.ulg.ac.be\")) \
         NIL NIL \
         ((NIL NIL \"team\" NIL) (NIL NIL \"ann\" \"example.com\") (NIL NIL NIL NIL)) \
         NIL NIL NIL \"<1234@local.machine.example>\"))\n\
         A1 OK Fetch completed\n",
    );
    let messages = parse_fetch(response.records("FETCH")).unwrap();

    assert_eq!(
        serde_json::to_value(&messages[0]).unwrap(),
        json!({
            "#": 4,
            "uid": 71,
            "envelope": {
                "date": "Mon, 7 Feb 1994 21:52:25 -0800",
                "subject": "café menu",
                "from": [{
                    "name": "André Pirard",
                    "sourceRoute": null,
                    "mailbox": "PIRARD",
                    "host": "vm1.ulg.ac.be"
                }],
                "sender": null,
                "replyTo": null,
                "to": [
                    {"name": null, "sourceRoute": null, "mailbox": "team", "host": null},
                    {"name": null, "sourceRoute": null, "mailbox": "ann", "host": "example.com"},
                    {"name": null, "sourceRoute": null, "mailbox": null, "host": null}
                ],
                "cc": null,
                "bcc": null,
                "inReplyTo": null,
                "messageId": "<1234@local.machine.example>"
            }
        })
    );
}

#[test]
fn test_fetch_bodystructure_encoded_filename() {
    let response = read(
        "* 1 FETCH (BODYSTRUCTURE ((\"APPLICATION\" \"OCTET-STREAM\" NIL NIL NIL \"BASE64\" 40 NIL \
         (\"ATTACHMENT\" (\"FILENAME\" \"=?ISO-8859-1?Q?BBR_Handel,_Gewerbe,_B=FCrobetriebe,?= \
         =?ISO-8859-1?Q?_private_Bildungseinrichtungen.txt?=\")) NIL) \"MIXED\" \
         (\"BOUNDARY\" \"----sinikael-?=_1-14105085265110.49903922458179295\") NIL NIL))\n\
         A1 OK done\n",
    );
    let messages = parse_fetch(response.records("FETCH")).unwrap();

    assert_eq!(
        serde_json::to_value(messages[0].bodystructure.as_ref().unwrap()).unwrap(),
        json!({
            "childNodes": [{
                "part": "1",
                "type": "application/octet-stream",
                "encoding": "base64",
                "size": 40,
                "disposition": "attachment",
                "dispositionParameters": {
                    "filename": "BBR Handel, Gewerbe, Bürobetriebe, private Bildungseinrichtungen.txt"
                }
            }],
            "type": "multipart/mixed",
            "parameters": {
                "boundary": "----sinikael-?=_1-14105085265110.49903922458179295"
            }
        })
    );
}

#[test]
fn test_fetch_nested_message() {
    let response = read(
        "* 9 FETCH (BODYSTRUCTURE ((\"TEXT\" \"PLAIN\" (\"CHARSET\" \"UTF-8\") NIL NIL \"QUOTED-PRINTABLE\" 310 12 NIL NIL NIL NIL)\
         (\"MESSAGE\" \"RFC822\" NIL NIL \"Forwarded\" \"7BIT\" 1520 \
         (NIL \"Fwd\" NIL NIL NIL NIL NIL NIL NIL NIL) \
         ((\"TEXT\" \"PLAIN\" NIL NIL NIL \"7BIT\" 20 1)(\"IMAGE\" \"GIF\" (\"NAME\" \"x.gif\") NIL NIL \"BASE64\" 800) \"MIXED\") 40) \
         \"MIXED\"))\n\
         A1 OK done\n",
    );
    let messages = parse_fetch(response.records("FETCH")).unwrap();
    let body = messages[0].bodystructure.as_ref().unwrap();

    let parts: Vec<_> = body
        .walk()
        .map(|node| (node.part.clone(), node.content_type.clone()))
        .collect();
    assert_eq!(
        parts,
        vec![
            (None, "multipart/mixed".to_string()),
            (Some("1".to_string()), "text/plain".to_string()),
            (Some("2".to_string()), "message/rfc822".to_string()),
            (Some("2".to_string()), "multipart/mixed".to_string()),
            (Some("2.1".to_string()), "text/plain".to_string()),
            (Some("2.2".to_string()), "image/gif".to_string()),
        ]
    );

    let message = body.find("2").unwrap();
    assert_eq!(message.description.as_deref(), Some("Forwarded"));
    assert_eq!(
        message.envelope.as_ref().unwrap().subject.as_deref(),
        Some("Fwd")
    );
    assert_eq!(message.lines, Some(40));
    assert_eq!(body.find("2.2").unwrap().filename(), Some("x.gif"));
}

#[test]
fn test_fetch_literal_items() {
    let response = read(
        "* 2 FETCH (UID 8 FLAGS (\\Seen) MODSEQ (12121231000) BODY[HEADER.FIELDS (SUBJECT)] {16}\n\
         Subject: Hello\n\
         )\n\
         A1 OK done\n",
    );
    let messages = parse_fetch(response.records("FETCH")).unwrap();

    assert_eq!(
        serde_json::to_value(&messages[0]).unwrap(),
        json!({
            "#": 2,
            "uid": 8,
            "flags": ["\\Seen"],
            "modseq": "12121231000",
            "body[header.fields (subject)]": "Subject: Hello\r\n"
        })
    );
}

#[test]
fn test_search_with_modseq() {
    let response = read("* SEARCH 15 2 7 (MODSEQ 917162500)\nA1 OK Search completed\n");
    assert_eq!(
        parse_search(response.records("SEARCH")).unwrap(),
        vec![2, 7, 15]
    );
}

#[test]
fn test_limits_apply_through_parser() {
    let response = read(
        "* 1 FETCH (ENVELOPE (NIL NIL ((NIL NIL \"a\" \"b\") (NIL NIL \"c\" \"d\")) NIL NIL NIL NIL NIL NIL NIL))\n\
         A1 OK done\n",
    );
    let parser = Parser::with_limits(Limits::builder().max_addresses(1).build());

    let err = parser.fetch(response.records("FETCH")).unwrap_err();
    assert_eq!(err.grammar(), Some(Grammar::Address));
    assert!(Parser::new().fetch(response.records("FETCH")).is_ok());
}

#[test]
fn test_malformed_envelope_reports_field() {
    let response = read("* 1 FETCH (ENVELOPE (NIL NIL NIL))\nA1 OK done\n");
    let err = parse_fetch(response.records("FETCH")).unwrap_err();

    assert_eq!(err.grammar(), Some(Grammar::Envelope));
    assert!(err.to_string().contains("expected 10 fields"));
}
