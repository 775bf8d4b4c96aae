//! ENVELOPE parser.

use mailtree_mime::decode_words;

use super::address::parse_address_list;
use super::cursor::{self, Cursor};
use crate::config::Limits;
use crate::tree::Token;
use crate::types::Envelope;
use crate::{Error, Grammar, Result};

const G: Grammar = Grammar::Envelope;

/// Parses the ten-slot ENVELOPE list.
pub fn parse_envelope(token: &Token, limits: &Limits) -> Result<Envelope> {
    let slots = cursor::list(G, "envelope", token)?;
    if slots.len() != 10 {
        return Err(Error::structure(
            G,
            "envelope",
            format!("expected 10 fields, got {}", slots.len()),
        ));
    }

    let mut slots = Cursor::new(G, slots);
    Ok(Envelope {
        date: slots.nstring("date")?.map(str::to_string),
        subject: slots.nstring("subject")?.map(decode_words),
        from: parse_address_list(slots.next("from")?, limits)?,
        sender: parse_address_list(slots.next("sender")?, limits)?,
        reply_to: parse_address_list(slots.next("replyTo")?, limits)?,
        to: parse_address_list(slots.next("to")?, limits)?,
        cc: parse_address_list(slots.next("cc")?, limits)?,
        bcc: parse_address_list(slots.next("bcc")?, limits)?,
        in_reply_to: slots.nstring("inReplyTo")?.map(str::to_string),
        message_id: slots.nstring("messageId")?.map(str::to_string),
    })
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

    fn sender() -> Token {
        Token::list(vec![Token::list(vec![
            Token::string("Terry Gray"),
            Token::Nil,
            Token::string("gray"),
            Token::string("cac.washington.edu"),
        ])])
    }

    fn rfc3501_envelope() -> Token {
        Token::list(vec![
            Token::string("Wed, 17 Jul 1996 02:23:25 -0700 (PDT)"),
            Token::string("IMAP4rev1 WG mtg summary and minutes"),
            sender(),
            sender(),
            sender(),
            Token::list(vec![Token::list(vec![
                Token::Nil,
                Token::Nil,
                Token::string("imap"),
                Token::string("cac.washington.edu"),
            ])]),
            Token::Nil,
            Token::Nil,
            Token::Nil,
            Token::string("<B27397-0100000@cac.washington.edu>"),
        ])
    }

    #[test]
    fn test_parse_envelope() {
        let envelope = parse_envelope(&rfc3501_envelope(), &Limits::default()).unwrap();

        assert_eq!(
            envelope.date.as_deref(),
            Some("Wed, 17 Jul 1996 02:23:25 -0700 (PDT)")
        );
        assert_eq!(
            envelope.subject.as_deref(),
            Some("IMAP4rev1 WG mtg summary and minutes")
        );
        assert_eq!(envelope.from.as_ref().unwrap()[0].name.as_deref(), Some("Terry Gray"));
        assert_eq!(envelope.to.as_ref().unwrap()[0].mailbox.as_deref(), Some("imap"));
        assert_eq!(envelope.cc, None);
        assert_eq!(envelope.bcc, None);
        assert_eq!(envelope.in_reply_to, None);
        assert_eq!(
            envelope.message_id.as_deref(),
            Some("<B27397-0100000@cac.washington.edu>")
        );
    }

    #[test]
    fn test_subject_decoded_date_verbatim() {
        let mut slots = vec![Token::Nil; 10];
        slots[0] = Token::string("=?utf-8?Q?not_decoded?=");
        slots[1] = Token::string("=?utf-8?B?w6TDtsO8?=");

        let envelope = parse_envelope(&Token::list(slots), &Limits::default()).unwrap();
        assert_eq!(envelope.date.as_deref(), Some("=?utf-8?Q?not_decoded?="));
        assert_eq!(envelope.subject.as_deref(), Some("äöü"));
    }

    #[test]
    fn test_wrong_arity() {
        let short = Token::list(vec![Token::Nil; 9]);
        let err = parse_envelope(&short, &Limits::default()).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::Envelope));

        assert!(parse_envelope(&Token::list(vec![Token::Nil; 11]), &Limits::default()).is_err());
        assert!(parse_envelope(&Token::Nil, &Limits::default()).is_err());
    }

    #[test]
    fn test_bad_address_slot() {
        let mut slots = vec![Token::Nil; 10];
        slots[2] = Token::string("joe@example.com");

        let err = parse_envelope(&Token::list(slots), &Limits::default()).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::Address));
    }
}
