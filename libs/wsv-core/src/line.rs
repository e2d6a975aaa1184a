//! A single line of a WSV document: its values, and — when whitespace is
//! being preserved — the gaps between tokens and any trailing comment.

use snafu::{ensure, Snafu};

use crate::charclass;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum Error {
    #[snafu(display("whitespace slot {index} contains a non-whitespace code point"))]
    InvalidWhitespaceCodePoint { index: usize },

    #[snafu(display("whitespace slot {index} is empty but is not the leading slot"))]
    EmptyNonLeadingWhitespaceSlot { index: usize },

    #[snafu(display("comment text contains a line feed"))]
    LineFeedInComment,
}

/// One line's values, plus (when the caller wants round-trip fidelity)
/// the exact whitespace runs and comment that produced them.
///
/// `whitespaces`, when present, has either `values.len()` or
/// `values.len() + 1` entries: one gap before each value, and an
/// optional trailing gap before the comment or end of line. A `None`
/// entry means "use the default gap" (the empty string before the
/// first value, a single space otherwise) — except for the trailing
/// slot, whose default-when-absent is governed by whether a comment
/// follows (see [`crate::serializer`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    values: Vec<Option<String>>,
    whitespaces: Option<Vec<Option<String>>>,
    comment: Option<String>,
}

impl Line {
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds a line from already-validated parts, used internally by
    /// the parser, which only ever produces whitespace runs and comment
    /// text that already satisfy [`Line`]'s invariants.
    pub(crate) fn from_parts(
        values: Vec<Option<String>>,
        whitespaces: Option<Vec<Option<String>>>,
        comment: Option<String>,
    ) -> Self {
        Line {
            values,
            whitespaces,
            comment,
        }
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }

    pub fn push_value(&mut self, value: Option<String>) {
        self.values.push(value);
    }

    pub fn whitespaces(&self) -> Option<&[Option<String>]> {
        self.whitespaces.as_deref()
    }

    /// Sets the whitespace slots, validating that every present slot is
    /// either empty-and-leading or a non-empty run of WSV whitespace.
    pub fn set_whitespaces(&mut self, whitespaces: Option<Vec<Option<String>>>) -> Result<()> {
        if let Some(slots) = &whitespaces {
            for (index, slot) in slots.iter().enumerate() {
                if let Some(s) = slot {
                    if s.is_empty() {
                        ensure!(index == 0, EmptyNonLeadingWhitespaceSlotSnafu { index });
                    } else {
                        ensure!(
                            charclass::is_all_whitespace(s),
                            InvalidWhitespaceCodePointSnafu { index }
                        );
                    }
                }
            }
        }
        self.whitespaces = whitespaces;
        Ok(())
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Sets the trailing comment text, validating that it contains no
    /// line feed (a comment always ends at the line's own terminator).
    pub fn set_comment(&mut self, comment: Option<String>) -> Result<()> {
        if let Some(text) = &comment {
            ensure!(!text.contains('\n'), LineFeedInCommentSnafu);
        }
        self.comment = comment;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.whitespaces.is_none() && self.comment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_empty_whitespace_slot_is_allowed() {
        let mut line = Line::new();
        line.push_value(Some("a".into()));
        assert!(line.set_whitespaces(Some(vec![Some("".into())])).is_ok());
    }

    #[test]
    fn non_leading_empty_whitespace_slot_is_rejected() {
        let mut line = Line::new();
        line.push_value(Some("a".into()));
        line.push_value(Some("b".into()));
        let err = line
            .set_whitespaces(Some(vec![None, Some("".into())]))
            .unwrap_err();
        assert_eq!(err, Error::EmptyNonLeadingWhitespaceSlot { index: 1 });
    }

    #[test]
    fn non_whitespace_slot_content_is_rejected() {
        let mut line = Line::new();
        line.push_value(Some("a".into()));
        let err = line
            .set_whitespaces(Some(vec![Some("x".into())]))
            .unwrap_err();
        assert_eq!(err, Error::InvalidWhitespaceCodePoint { index: 0 });
    }

    #[test]
    fn comment_with_line_feed_is_rejected() {
        let mut line = Line::new();
        let err = line.set_comment(Some("a\nb".into())).unwrap_err();
        assert_eq!(err, Error::LineFeedInComment);
    }

    #[test]
    fn comment_without_line_feed_is_accepted() {
        let mut line = Line::new();
        assert!(line.set_comment(Some("a valid comment".into())).is_ok());
    }

}
