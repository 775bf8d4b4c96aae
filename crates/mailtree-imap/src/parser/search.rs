//! SEARCH response parser.

use super::cursor;
use crate::tree::{Record, Token};
use crate::{Grammar, Result};

/// Collects the numbers of all `SEARCH` records, ascending.
///
/// A trailing `(MODSEQ n)` from CONDSTORE is skipped.
pub fn parse_search(records: &[Record]) -> Result<Vec<u32>> {
    let mut numbers = Vec::new();

    for token in records.iter().flat_map(|record| &record.attributes) {
        if is_modseq(token) {
            continue;
        }
        numbers.push(cursor::number(Grammar::Search, "number", token)?);
    }

    numbers.sort_unstable();
    Ok(numbers)
}

fn is_modseq(token: &Token) -> bool {
    token
        .as_list()
        .and_then(<[Token]>::first)
        .is_some_and(|first| cursor::is_keyword(first, "MODSEQ"))
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

    fn numbers(values: &[&str]) -> Record {
        Record::with_attributes(values.iter().map(|v| Token::atom(*v)).collect())
    }

    #[test]
    fn test_sorted() {
        let records = [numbers(&["5", "3"]), numbers(&["4", "1"])];
        assert_eq!(parse_search(&records).unwrap(), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_empty() {
        assert!(parse_search(&[]).unwrap().is_empty());
        assert!(parse_search(&[numbers(&[])]).unwrap().is_empty());
    }

    #[test]
    fn test_modseq_skipped() {
        let mut record = numbers(&["2", "84"]);
        record.attributes.push(Token::list(vec![
            Token::atom("MODSEQ"),
            Token::atom("917162500"),
        ]));
        assert_eq!(parse_search(&[record]).unwrap(), vec![2, 84]);
    }

    #[test]
    fn test_non_numeric() {
        let err = parse_search(&[numbers(&["1", "two"])]).unwrap_err();
        assert_eq!(err.grammar(), Some(Grammar::Search));
    }
}
