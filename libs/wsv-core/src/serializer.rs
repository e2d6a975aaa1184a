//! Renders values, lines, and documents back into WSV text.

use crate::charclass;
use crate::line::Line;

/// Serializes a single value using the minimal quoting the grammar
/// requires: `-` for null, a doubled quote for an empty string, a
/// quoted `"-"` for a literal dash, and a bare token for anything that
/// needs no escaping.
pub fn serialize_value(value: &Option<String>) -> String {
    match value {
        None => "-".to_string(),
        Some(s) if s.is_empty() => "\"\"".to_string(),
        Some(s) if s == "-" => "\"-\"".to_string(),
        Some(s) if needs_quoting(s) => quote(s),
        Some(s) => s.clone(),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.chars()
        .any(|c| c == '"' || c == '#' || c == '\n' || charclass::is_whitespace(c))
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\"/\""),
            '"' => out.push_str("\"\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Serializes a line's values only, space-separated, discarding any
/// whitespace/comment detail it might carry.
pub fn serialize_line_non_preserving(values: &[Option<String>]) -> String {
    values
        .iter()
        .map(serialize_value)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serializes a line exactly as recorded: every whitespace slot (or its
/// default) between tokens, then the trailing comment if present.
pub fn serialize_line_preserving(line: &Line) -> String {
    let values = line.values();
    let whitespaces = line.whitespaces();
    let mut out = String::new();

    for (i, value) in values.iter().enumerate() {
        let gap: Option<String> = whitespaces.and_then(|w| w.get(i)).cloned().flatten();
        match gap {
            Some(s) => out.push_str(&s),
            None => {
                if i != 0 {
                    out.push(' ');
                }
            }
        }
        out.push_str(&serialize_value(value));
    }

    let trailing: Option<Option<String>> = whitespaces.and_then(|w| w.get(values.len())).cloned();
    match trailing {
        Some(slot) => out.push_str(&slot.unwrap_or_default()),
        None => {
            if line.comment().is_some() && !values.is_empty() {
                out.push(' ');
            }
        }
    }

    if let Some(comment) = line.comment() {
        out.push('#');
        out.push_str(comment);
    }

    out
}

/// Serializes a whole document: one rendered line per [`Line`], joined
/// with the format's line terminator via [`wsv_encoding::join_lines`].
pub fn serialize_document(lines: &[Line], preserving: bool) -> String {
    let rendered: Vec<String> = lines
        .iter()
        .map(|line| {
            if preserving {
                serialize_line_preserving(line)
            } else {
                serialize_line_non_preserving(line.values())
            }
        })
        .collect();
    wsv_encoding::join_lines(&rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn serializes_null_empty_and_dash() {
        assert_eq!(serialize_value(&None), "-");
        assert_eq!(serialize_value(&Some("".into())), "\"\"");
        assert_eq!(serialize_value(&Some("-".into())), "\"-\"");
    }

    #[test]
    fn serializes_plain_value_unquoted() {
        assert_eq!(serialize_value(&Some("hello".into())), "hello");
    }

    #[test]
    fn quotes_values_containing_special_characters() {
        assert_eq!(serialize_value(&Some("a b".into())), "\"a b\"");
        assert_eq!(serialize_value(&Some("a\"b".into())), "\"a\"\"b\"");
        assert_eq!(serialize_value(&Some("a\nb".into())), "\"a\"/\"b\"");
        assert_eq!(serialize_value(&Some("a#b".into())), "\"a#b\"");
    }

    #[test]
    fn non_preserving_round_trip_is_value_equivalent() {
        let input = "a b \"c d\" -";
        let values = parser::parse_single_line(input, false).unwrap().into_values();
        let rendered = serialize_line_non_preserving(&values);
        let reparsed = parser::parse_single_line(&rendered, false).unwrap().into_values();
        assert_eq!(values, reparsed);
    }

    #[test]
    fn preserving_round_trip_reproduces_exact_text() {
        for input in [
            "a b c",
            "  a  #hi",
            "a#hi",
            "#hi",
            "#",
            "a b  ",
            "",
            "\"d\"/\"e\" \"b\"\"c\"",
        ] {
            let line = parser::parse_single_line(input, true).unwrap();
            assert_eq!(serialize_line_preserving(&line), input);
        }
    }

    #[test]
    fn document_serialization_joins_with_line_feed() {
        let lines = parser::parse_lines_non_preserving("a\nb c\n", 0).unwrap();
        assert_eq!(serialize_document(&lines, false), "a\nb c\n");
    }
}
