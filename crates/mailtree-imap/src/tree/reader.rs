//! Builds token trees from raw response bytes.
//!
//! The reader splits input into response lines (literals may span line
//! breaks), turns each untagged line into a [`Record`] and collects them
//! into a [`Response`] when the tagged completion arrives.

use super::lexer::{Lexeme, Lexer, text_from_bytes};
use super::{Record, Response, ResponseCode, Token};
use crate::Result;

/// Deepest list nesting accepted in raw input.
const MAX_LIST_DEPTH: usize = 128;

/// Status responses whose remainder is `[code] text` instead of data.
const STATUS_RESPONSES: [&str; 5] = ["OK", "NO", "BAD", "BYE", "PREAUTH"];

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Untagged data, e.g. `* 23 EXISTS`.
    Untagged {
        /// Upper-cased response name.
        name: String,
        /// Line contents.
        record: Record,
    },
    /// Tagged command completion.
    Tagged {
        /// Command tag.
        tag: String,
        /// Upper-cased status.
        command: String,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: Option<String>,
    },
    /// Continuation request.
    Continuation {
        /// Optional text.
        text: Option<String>,
    },
}

/// Where a run of values ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Close {
    /// End of line or input.
    Line,
    /// Closing parenthesis.
    Paren,
}

/// Reads response lines from a byte buffer.
pub struct ResponseReader<'a> {
    lexer: Lexer<'a>,
}

impl<'a> ResponseReader<'a> {
    /// Creates a reader over raw response bytes.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    /// Reads one complete command response from `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be tokenized or ends before
    /// the tagged completion.
    pub fn parse(input: &'a [u8]) -> Result<Response> {
        Self::new(input).read_response()
    }

    /// Reads lines until the next tagged completion.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be tokenized or the input ends
    /// before a tagged line.
    pub fn read_response(&mut self) -> Result<Response> {
        let mut response = Response::default();

        while let Some(line) = self.next_line()? {
            match line {
                Line::Untagged { name, record } => response.push(&name, record),
                Line::Tagged {
                    tag,
                    command,
                    code,
                    text,
                } => {
                    response.tag = tag;
                    response.command = command;
                    response.code = code;
                    response.text = text;
                    return Ok(response);
                }
                Line::Continuation { .. } => {
                    tracing::trace!("skipping continuation request");
                }
            }
        }

        Err(self.lexer.error("Missing tagged completion"))
    }

    /// Reads the next line, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be tokenized.
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        loop {
            match self.lexer.next_lexeme()? {
                Lexeme::Crlf => {}
                Lexeme::Eof => return Ok(None),
                Lexeme::Asterisk => {
                    self.lexer.expect_space()?;
                    return self.read_untagged().map(Some);
                }
                Lexeme::Plus => {
                    self.lexer.skip_spaces();
                    let text = non_empty(self.lexer.read_text_until_crlf());
                    return Ok(Some(Line::Continuation { text }));
                }
                Lexeme::Atom(tag) => {
                    self.lexer.expect_space()?;
                    let command = self.lexer.read_atom_string()?.to_ascii_uppercase();
                    let (code, text) = self.read_resp_text()?;
                    return Ok(Some(Line::Tagged {
                        tag: tag.to_string(),
                        command,
                        code,
                        text,
                    }));
                }
                lexeme => {
                    return Err(self
                        .lexer
                        .error(&format!("Expected *, +, or tag, got {lexeme:?}")));
                }
            }
        }
    }

    fn read_untagged(&mut self) -> Result<Line> {
        let first = self.lexer.read_atom_string()?;

        if first.bytes().all(|b| b.is_ascii_digit()) {
            let nr = first
                .parse()
                .map_err(|_| self.lexer.error("Number too large"))?;
            self.lexer.expect_space()?;
            let name = self.lexer.read_atom_string()?.to_ascii_uppercase();
            let attributes = read_values(&mut self.lexer, Close::Line, 0)?;

            return Ok(Line::Untagged {
                name,
                record: Record::numbered(nr, attributes),
            });
        }

        let name = first.to_ascii_uppercase();
        let record = if STATUS_RESPONSES.contains(&name.as_str()) {
            let (code, text) = self.read_resp_text()?;
            Record {
                code,
                text,
                ..Record::default()
            }
        } else {
            Record::with_attributes(read_values(&mut self.lexer, Close::Line, 0)?)
        };

        Ok(Line::Untagged { name, record })
    }

    /// Reads `[code] text` up to the end of the line.
    fn read_resp_text(&mut self) -> Result<(Option<ResponseCode>, Option<String>)> {
        self.lexer.skip_spaces();

        let code = if self.lexer.peek() == Some(b'[') {
            self.lexer.advance();
            Some(self.read_code()?)
        } else {
            None
        };

        self.lexer.skip_spaces();
        let text = non_empty(self.lexer.read_text_until_crlf());

        Ok((code, text))
    }

    /// Reads a response code after its opening bracket.
    ///
    /// Arguments that cannot be tokenized are dropped; the code name alone
    /// is still useful to callers.
    fn read_code(&mut self) -> Result<ResponseCode> {
        let rest = self.lexer.remaining();
        let end = rest
            .iter()
            .position(|&b| matches!(b, b']' | b'\r' | b'\n'))
            .filter(|&i| rest[i] == b']')
            .ok_or_else(|| self.lexer.error("Unterminated response code"))?;
        self.lexer.skip(end + 1);

        let mut inner = Lexer::new(&rest[..end]);
        let name = inner.read_atom_string()?;
        let args = read_values(&mut inner, Close::Line, 0).unwrap_or_else(|e| {
            tracing::debug!(code = name, error = %e, "dropping unreadable response code arguments");
            Vec::new()
        });

        Ok(ResponseCode::new(name, args))
    }
}

/// Reads space-separated values until `close`.
fn read_values(lexer: &mut Lexer<'_>, close: Close, depth: usize) -> Result<Vec<Token>> {
    if depth > MAX_LIST_DEPTH {
        return Err(lexer.error("List nesting too deep"));
    }

    let mut values = Vec::new();

    loop {
        let value = match lexer.next_lexeme()? {
            Lexeme::Space => continue,
            Lexeme::Crlf | Lexeme::Eof if close == Close::Line => break,
            Lexeme::RParen if close == Close::Paren => break,
            Lexeme::Crlf | Lexeme::Eof => return Err(lexer.error("Unterminated list")),
            Lexeme::LParen => Token::List(read_values(lexer, Close::Paren, depth + 1)?),
            Lexeme::Atom(s) => Token::Atom(s.to_string()),
            Lexeme::QuotedString(s) => Token::String(s),
            Lexeme::Literal(data) => Token::String(text_from_bytes(data)),
            Lexeme::Nil => Token::Nil,
            Lexeme::Asterisk => Token::atom("*"),
            Lexeme::Plus => Token::atom("+"),
            lexeme => return Err(lexer.error(&format!("Unexpected {lexeme:?}"))),
        };
        values.push(value);
    }

    Ok(values)
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
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
    use crate::Error;

    #[test]
    fn test_read_select_response() {
        let input = b"* 172 EXISTS\r\n\
            * FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n\
            * OK [PERMANENTFLAGS (\\Deleted \\Seen \\*)] Limited\r\n\
            * OK [UIDVALIDITY 3857529045] UIDs valid\r\n\
            A142 OK [READ-WRITE] SELECT completed\r\n";
        let response = ResponseReader::parse(input).unwrap();

        assert_eq!(response.tag, "A142");
        assert_eq!(response.command, "OK");
        assert_eq!(response.code_name(), Some("READ-WRITE"));
        assert_eq!(response.text.as_deref(), Some("SELECT completed"));

        assert_eq!(response.records("EXISTS")[0].nr, Some(172));
        assert_eq!(
            response.records("FLAGS")[0].attributes[0].as_list().unwrap().len(),
            5
        );

        let ok = response.records("OK");
        assert_eq!(ok.len(), 2);
        let permanent = ok[0].code.as_ref().unwrap();
        assert_eq!(permanent.name, "PERMANENTFLAGS");
        assert_eq!(
            permanent.args,
            vec![Token::list(vec![
                Token::atom("\\Deleted"),
                Token::atom("\\Seen"),
                Token::atom("\\*"),
            ])]
        );
        assert_eq!(ok[0].text.as_deref(), Some("Limited"));
        assert_eq!(
            ok[1].code.as_ref().unwrap().args,
            vec![Token::atom("3857529045")]
        );
    }

    #[test]
    fn test_read_namespace_line() {
        let input = b"* NAMESPACE ((\"\" NIL)) NIL NIL\r\nA1 OK done\r\n";
        let response = ResponseReader::parse(input).unwrap();

        assert_eq!(
            response.records("NAMESPACE")[0].attributes,
            vec![
                Token::list(vec![Token::list(vec![Token::string(""), Token::Nil])]),
                Token::Nil,
                Token::Nil,
            ]
        );
    }

    #[test]
    fn test_read_literal_spanning_lines() {
        let input = b"* 1 FETCH (BODY[HEADER] {14}\r\nSubject: x\r\n\r\n)\r\nA1 OK done\r\n";
        let response = ResponseReader::parse(input).unwrap();
        let fetch = &response.records("FETCH")[0];

        assert_eq!(fetch.nr, Some(1));
        assert_eq!(
            fetch.attributes,
            vec![Token::list(vec![
                Token::atom("BODY[HEADER]"),
                Token::string("Subject: x\r\n\r\n"),
            ])]
        );
    }

    #[test]
    fn test_next_line_kinds() {
        let mut reader = ResponseReader::new(b"+ go ahead\r\n* BYE later\r\n");

        assert_eq!(
            reader.next_line().unwrap(),
            Some(Line::Continuation {
                text: Some("go ahead".to_string())
            })
        );
        assert_eq!(
            reader.next_line().unwrap(),
            Some(Line::Untagged {
                name: "BYE".to_string(),
                record: Record {
                    text: Some("later".to_string()),
                    ..Record::default()
                },
            })
        );
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn test_code_with_unreadable_args() {
        let input = b"* OK [X-ODD {oops] text\r\nA1 OK done\r\n";
        let response = ResponseReader::parse(input).unwrap();
        let code = response.records("OK")[0].code.clone().unwrap();

        assert_eq!(code.name, "X-ODD");
        assert!(code.args.is_empty());
    }

    #[test]
    fn test_missing_tagged_completion() {
        let result = ResponseReader::parse(b"* 3 EXISTS\r\n");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_unterminated_list() {
        let result = ResponseReader::parse(b"* FLAGS (\\Seen\r\nA1 OK done\r\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let mut input = b"* X ".to_vec();
        input.extend(std::iter::repeat_n(b'(', MAX_LIST_DEPTH + 2));
        input.extend(std::iter::repeat_n(b')', MAX_LIST_DEPTH + 2));
        input.extend_from_slice(b"\r\nA1 OK done\r\n");

        assert!(ResponseReader::parse(&input).is_err());
    }
}
