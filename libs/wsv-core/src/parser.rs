//! The textual WSV tokenizer.
//!
//! Scans a `&str` once, left to right, producing [`Line`] values. Quoted
//! strings, comments, and the bare-value/`-`-means-null rule are all
//! handled here; the whitespace-preserving variants additionally record
//! every gap between tokens so a parsed document can be serialized back
//! to its exact original bytes.

use std::str::CharIndices;

use snafu::Snafu;

use crate::charclass;
use crate::line::Line;

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

/// A zero-based location within the input: an absolute code-point index,
/// a line number, and a column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum Error {
    #[snafu(display("String not closed ({}, {})", position.line + 1, position.column + 1))]
    StringNotClosed { position: Position },

    #[snafu(display("Invalid string line break ({}, {})", position.line + 1, position.column + 1))]
    InvalidStringLineBreak { position: Position },

    #[snafu(display("Invalid character after string ({}, {})", position.line + 1, position.column + 1))]
    InvalidCharacterAfterString { position: Position },

    #[snafu(display("Invalid double quote in value ({}, {})", position.line + 1, position.column + 1))]
    InvalidDoubleQuoteInValue { position: Position },

    // Scanning operates on `&str`, whose UTF-8 invariant already rules
    // out lone surrogates, so this variant is never constructed by
    // anything in this module; it exists so a single `Error` enum
    // still covers every kind listed in `charclass::Error` for callers
    // matching on it exhaustively.
    #[snafu(display("Invalid UTF-16 string ({}, {})", position.line + 1, position.column + 1))]
    InvalidUtf16String {
        position: Position,
        source: charclass::Error,
    },

    #[snafu(display("Multiple lines not allowed"))]
    MultipleLinesNotAllowed,

    #[snafu(display("No value"))]
    NoValue,

    #[snafu(display("Multiple values"))]
    MultipleValues,
}

/// A forward-only cursor over the input, tracking byte index, line
/// number, and column as it goes. Code points are consumed one at a
/// time, mirroring the pop-one-char-at-a-time style of this crate's
/// escape-sequence scanners.
struct Scanner<'a> {
    input: &'a str,
    chars: std::iter::Peekable<CharIndices<'a>>,
    line_no: usize,
    line_start: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, line_index_offset: usize) -> Self {
        Scanner {
            input,
            chars: input.char_indices().peekable(),
            line_no: line_index_offset,
            line_start: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn pos(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.input.len())
    }

    fn position(&mut self) -> Position {
        let index = self.pos();
        Position {
            index,
            line: self.line_no,
            column: index - self.line_start,
        }
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    /// Consumes the line feed the caller has already peeked, advancing
    /// to the next line.
    fn consume_line_feed(&mut self) {
        self.bump();
        self.line_no += 1;
        self.line_start = self.pos();
    }
}

fn parse_quoted(scanner: &mut Scanner) -> Result<String> {
    scanner.bump(); // opening quote
    let mut result = String::new();
    loop {
        match scanner.peek() {
            None => return StringNotClosedSnafu { position: scanner.position() }.fail(),
            Some('\n') => return StringNotClosedSnafu { position: scanner.position() }.fail(),
            Some('"') => {
                scanner.bump();
                match scanner.peek() {
                    Some('"') => {
                        scanner.bump();
                        result.push('"');
                    }
                    Some('/') => {
                        let slash_position = scanner.position();
                        scanner.bump();
                        match scanner.peek() {
                            Some('"') => {
                                scanner.bump();
                                result.push('\n');
                            }
                            _ => return InvalidStringLineBreakSnafu { position: slash_position }.fail(),
                        }
                    }
                    None | Some('\n') | Some('#') => return Ok(result),
                    Some(c) if charclass::is_whitespace(c) => return Ok(result),
                    Some(_) => {
                        return InvalidCharacterAfterStringSnafu { position: scanner.position() }.fail()
                    }
                }
            }
            Some(c) => {
                result.push(c);
                scanner.bump();
            }
        }
    }
}

fn parse_bare(scanner: &mut Scanner) -> Result<String> {
    let mut result = String::new();
    loop {
        match scanner.peek() {
            None | Some('\n') | Some('#') => break,
            Some(c) if charclass::is_whitespace(c) => break,
            Some('"') => {
                return InvalidDoubleQuoteInValueSnafu { position: scanner.position() }.fail()
            }
            Some(c) => {
                result.push(c);
                scanner.bump();
            }
        }
    }
    Ok(result)
}

fn token_to_value(s: String) -> Option<String> {
    if s == "-" {
        None
    } else {
        Some(s)
    }
}

/// Parses one line starting at the scanner's current position. Returns
/// the line together with whether a line feed was consumed to get
/// there (as opposed to running out of input).
fn parse_one_line(scanner: &mut Scanner, preserving: bool) -> Result<(Line, bool)> {
    let mut values: Vec<Option<String>> = Vec::new();
    let mut whitespaces: Vec<Option<String>> = Vec::new();
    let mut pending_ws: Option<String> = None;
    let mut comment: Option<String> = None;

    loop {
        match scanner.peek() {
            None => {
                if pending_ws.is_some() || comment.is_some() {
                    whitespaces.push(pending_ws.take());
                }
                let line = Line::from_parts(values, preserving.then_some(whitespaces), comment);
                return Ok((line, false));
            }
            Some('\n') => {
                scanner.consume_line_feed();
                if pending_ws.is_some() || comment.is_some() {
                    whitespaces.push(pending_ws.take());
                }
                let line = Line::from_parts(values, preserving.then_some(whitespaces), comment);
                return Ok((line, true));
            }
            Some('#') => {
                scanner.bump();
                let mut text = String::new();
                loop {
                    match scanner.peek() {
                        None | Some('\n') => break,
                        Some(c) => {
                            text.push(c);
                            scanner.bump();
                        }
                    }
                }
                comment = Some(text);
            }
            Some(c) if charclass::is_whitespace(c) => {
                let mut ws = String::new();
                while let Some(c2) = scanner.peek() {
                    if charclass::is_whitespace(c2) {
                        ws.push(c2);
                        scanner.bump();
                    } else {
                        break;
                    }
                }
                pending_ws = Some(ws);
            }
            Some('"') => {
                let value = parse_quoted(scanner)?;
                whitespaces.push(pending_ws.take());
                values.push(Some(value));
            }
            Some(_) => {
                let token = parse_bare(scanner)?;
                whitespaces.push(pending_ws.take());
                values.push(token_to_value(token));
            }
        }
    }
}

fn parse_lines(input: &str, preserving: bool, line_index_offset: usize) -> Result<Vec<Line>> {
    let mut scanner = Scanner::new(input, line_index_offset);
    let mut lines = Vec::new();
    loop {
        let (line, consumed_lf) = parse_one_line(&mut scanner, preserving)?;
        lines.push(line);
        if !consumed_lf {
            break;
        }
    }
    Ok(lines)
}

/// Parses `input` into lines that carry enough whitespace and comment
/// detail to be serialized back to the exact original text.
pub fn parse_lines_preserving(input: &str, line_index_offset: usize) -> Result<Vec<Line>> {
    parse_lines(input, true, line_index_offset)
}

/// Parses `input` into lines holding only values: whitespace layout and
/// comment text are discarded as they are scanned.
pub fn parse_lines_non_preserving(input: &str, line_index_offset: usize) -> Result<Vec<Line>> {
    parse_lines(input, false, line_index_offset)
}

/// Parses `input` directly into a jagged array of values, skipping
/// [`Line`] construction entirely. Semantics are otherwise identical to
/// [`parse_lines_non_preserving`].
pub fn parse_as_jagged_array(
    input: &str,
    line_index_offset: usize,
) -> Result<Vec<Vec<Option<String>>>> {
    let lines = parse_lines_non_preserving(input, line_index_offset)?;
    Ok(lines.into_iter().map(Line::into_values).collect())
}

/// Parses `input` as a single line. Fails with [`Error::MultipleLinesNotAllowed`]
/// if it contains more than one (including the implicit empty line a
/// trailing line feed introduces).
pub fn parse_single_line(input: &str, preserving: bool) -> Result<Line> {
    let mut lines = parse_lines(input, preserving, 0)?;
    snafu::ensure!(lines.len() == 1, MultipleLinesNotAllowedSnafu);
    Ok(lines.pop().unwrap())
}

/// Parses `input` as a single line holding exactly one value, returning
/// that value directly.
pub fn parse_single_value(input: &str) -> Result<Option<String>> {
    let line = parse_single_line(input, false)?;
    let mut values = line.into_values();
    match values.len() {
        0 => NoValueSnafu.fail(),
        1 => Ok(values.pop().unwrap()),
        _ => MultipleValuesSnafu.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_of(line: &str) -> Vec<Option<String>> {
        parse_single_line(line, false).unwrap().into_values()
    }

    #[test]
    fn parses_plain_bare_values() {
        assert_eq!(
            values_of("a b c"),
            vec![Some("a".into()), Some("b".into()), Some("c".into())]
        );
    }

    #[test]
    fn dash_is_null() {
        assert_eq!(values_of("a - c"), vec![Some("a".into()), None, Some("c".into())]);
    }

    #[test]
    fn quoted_value_with_embedded_quote_and_line_break() {
        let line = parse_single_line(r#""d"/"e" "b""c""#, false).unwrap();
        assert_eq!(
            line.into_values(),
            vec![Some("d\ne".into()), Some("b\"c".into())]
        );
    }

    #[test]
    fn empty_quoted_value_is_not_null() {
        assert_eq!(values_of(r#"a """#), vec![Some("a".into()), Some("".into())]);
    }

    #[test]
    fn comment_without_leading_whitespace() {
        let line = parse_single_line("a#hi", true).unwrap();
        assert_eq!(line.into_values(), vec![Some("a".into())]);
    }

    #[test]
    fn bare_double_quote_in_value_is_an_error() {
        let err = parse_single_line(r#"abc"def""#, false).unwrap_err();
        assert!(matches!(err, Error::InvalidDoubleQuoteInValue { .. }));
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = parse_single_line(r#""abc"#, false).unwrap_err();
        match err {
            Error::StringNotClosed { position } => {
                assert_eq!(position, Position { index: 4, line: 0, column: 4 })
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn raw_line_feed_inside_string_is_not_closed() {
        let err = parse_lines_non_preserving("\"ab\ncd\"", 0).unwrap_err();
        assert!(matches!(err, Error::StringNotClosed { .. }));
    }

    #[test]
    fn invalid_string_line_break_needs_trailing_quote() {
        let err = parse_single_line(r#""a"/b"#, false).unwrap_err();
        assert!(matches!(err, Error::InvalidStringLineBreak { .. }));
    }

    #[test]
    fn invalid_character_immediately_after_string() {
        let err = parse_single_line(r#""a"b"#, false).unwrap_err();
        assert!(matches!(err, Error::InvalidCharacterAfterString { .. }));
    }

    #[test]
    fn quoted_string_ending_exactly_at_eof_is_fine() {
        let line = parse_single_line(r#""abc""#, false).unwrap();
        assert_eq!(line.into_values(), vec![Some("abc".into())]);
    }

    #[test]
    fn empty_input_is_a_single_empty_line() {
        let lines = parse_lines_non_preserving("", 0).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].values().is_empty());
    }

    #[test]
    fn trailing_line_feed_introduces_a_final_empty_line() {
        let lines = parse_lines_non_preserving("a\n", 0).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].values().is_empty());
    }

    #[test]
    fn multiple_lines_rejected_by_single_line_parse() {
        let err = parse_single_line("a\nb", false).unwrap_err();
        assert!(matches!(err, Error::MultipleLinesNotAllowed));
    }

    #[test]
    fn single_value_helpers() {
        assert_eq!(parse_single_value("hello").unwrap(), Some("hello".into()));
        assert_eq!(parse_single_value("-").unwrap(), None);
        assert!(matches!(parse_single_value("").unwrap_err(), Error::NoValue));
        assert!(matches!(
            parse_single_value("a b").unwrap_err(),
            Error::MultipleValues
        ));
    }

    #[test]
    fn jagged_array_matches_non_preserving_values() {
        let rows = parse_as_jagged_array("a b\nc", 0).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Some("a".into()), Some("b".into())],
                vec![Some("c".into())],
            ]
        );
    }

    #[test]
    fn whitespace_slots_track_gaps_exactly() {
        let line = parse_single_line("  a  #hi", true).unwrap();
        assert_eq!(line.values(), &[Some("a".to_string())]);
        assert_eq!(
            line.whitespaces(),
            Some(&[Some("  ".to_string()), Some("  ".to_string())][..])
        );
        assert_eq!(line.comment(), Some("hi"));
    }

    #[test]
    fn leading_slot_is_null_when_value_starts_at_column_zero() {
        let line = parse_single_line("a b", true).unwrap();
        assert_eq!(
            line.whitespaces(),
            Some(&[None, Some(" ".to_string())][..])
        );
    }
}
