//! ENVELOPE address list parser.

use mailtree_mime::decode_words;

use super::cursor::{self, Cursor};
use crate::config::Limits;
use crate::tree::Token;
use crate::types::Address;
use crate::{Error, Grammar, Result};

const G: Grammar = Grammar::Address;

/// Parses an address list slot: NIL, or a list of 4-element addresses.
pub fn parse_address_list(token: &Token, limits: &Limits) -> Result<Option<Vec<Address>>> {
    let Some(entries) = cursor::list_or_nil(G, "addresses", token)? else {
        return Ok(None);
    };

    if entries.len() > limits.max_addresses {
        return Err(Error::structure(
            G,
            "addresses",
            format!(
                "{} entries exceed the limit of {}",
                entries.len(),
                limits.max_addresses
            ),
        ));
    }

    entries.iter().map(parse_address).collect::<Result<_>>().map(Some)
}

/// Parses `(name adl mailbox host)`.
fn parse_address(token: &Token) -> Result<Address> {
    let fields = cursor::list(G, "address", token)?;
    if fields.len() != 4 {
        return Err(Error::structure(
            G,
            "address",
            format!("expected 4 fields, got {}", fields.len()),
        ));
    }

    let mut fields = Cursor::new(G, fields);
    Ok(Address {
        name: fields.nstring("name")?.map(decode_words),
        source_route: fields.nstring("sourceRoute")?.map(str::to_string),
        mailbox: fields.nstring("mailbox")?.map(str::to_string),
        host: fields.nstring("host")?.map(str::to_string),
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

    fn nstring(value: Option<&str>) -> Token {
        value.map_or(Token::Nil, Token::string)
    }

    fn address(name: Option<&str>, mailbox: Option<&str>, host: Option<&str>) -> Token {
        Token::list(vec![nstring(name), Token::Nil, nstring(mailbox), nstring(host)])
    }

    #[test]
    fn test_nil_is_absent() {
        assert_eq!(parse_address_list(&Token::Nil, &Limits::default()).unwrap(), None);
    }

    #[test]
    fn test_empty_list_is_empty() {
        let list = Token::list(vec![]);
        assert_eq!(
            parse_address_list(&list, &Limits::default()).unwrap(),
            Some(vec![])
        );
    }

    #[test]
    fn test_decodes_display_name() {
        let list = Token::list(vec![address(
            Some("=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?="),
            Some("keld"),
            Some("dkuug.dk"),
        )]);

        let addresses = parse_address_list(&list, &Limits::default()).unwrap().unwrap();
        assert_eq!(addresses[0].name.as_deref(), Some("Keld Jørn Simonsen"));
        assert_eq!(addresses[0].mailbox.as_deref(), Some("keld"));
        assert_eq!(addresses[0].host.as_deref(), Some("dkuug.dk"));
        assert_eq!(addresses[0].source_route, None);
    }

    #[test]
    fn test_group_markers_preserved() {
        let list = Token::list(vec![
            address(None, Some("undisclosed-recipients"), None),
            address(Some("Ann"), Some("ann"), Some("example.com")),
            address(None, None, None),
        ]);

        let addresses = parse_address_list(&list, &Limits::default()).unwrap().unwrap();
        assert_eq!(addresses.len(), 3);
        assert!(addresses[0].is_group_start());
        assert_eq!(addresses[0].mailbox.as_deref(), Some("undisclosed-recipients"));
        assert!(!addresses[1].is_group_start());
        assert!(addresses[2].is_group_end());
    }

    #[test]
    fn test_wrong_arity() {
        let list = Token::list(vec![Token::list(vec![Token::Nil, Token::Nil])]);
        let err = parse_address_list(&list, &Limits::default()).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::Address));
    }

    #[test]
    fn test_address_limit() {
        let list = Token::list(vec![address(None, Some("a"), Some("b")); 3]);
        let limits = Limits::builder().max_addresses(2).build();
        assert!(parse_address_list(&list, &limits).is_err());
    }

    #[test]
    fn test_not_a_list() {
        assert!(parse_address_list(&Token::string("joe"), &Limits::default()).is_err());
    }
}
