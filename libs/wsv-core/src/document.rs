//! The top-level `Document`: an ordered list of [`Line`]s together with
//! the text encoding it should round-trip through when read from or
//! written to bytes.

use snafu::{ResultExt, Snafu};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::binary;
use crate::line::Line;
use crate::parser;
use crate::serializer;

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{source}"))]
    Utf8 { source: wsv_encoding::utf8::Error },

    #[snafu(display("{source}"))]
    Parse { source: parser::Error },
}

/// The Unicode transfer encoding a textual document was read from (or
/// should be written in). WSV content itself is always Unicode text;
/// this only controls the byte-level framing at the document's edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Utf8
    }
}

/// A parsed (or programmatically built) WSV document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Document {
    lines: Vec<Line>,
    encoding: TextEncoding,
}

impl Document {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Document {
            lines,
            encoding: TextEncoding::default(),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut Vec<Line> {
        &mut self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    pub fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    /// Parses `text`, keeping enough whitespace and comment detail to
    /// serialize back to the exact original bytes.
    pub fn parse_preserving(text: &str) -> parser::Result<Self> {
        Ok(Self::from_lines(parser::parse_lines_preserving(text, 0)?))
    }

    /// Parses `text`, keeping only the values of each line.
    pub fn parse_non_preserving(text: &str) -> parser::Result<Self> {
        Ok(Self::from_lines(parser::parse_lines_non_preserving(text, 0)?))
    }

    /// Serializes the document, reproducing recorded whitespace and
    /// comments when `preserving` is set.
    pub fn serialize(&self, preserving: bool) -> String {
        serializer::serialize_document(&self.lines, preserving)
    }

    /// Encodes the document as Binary WSV (values only; whitespace and
    /// comments never survive this round trip).
    pub fn to_binary(&self, include_preamble: bool) -> binary::Result<Vec<u8>> {
        binary::encode(&self.lines, include_preamble)
    }

    /// Decodes a document from Binary WSV.
    pub fn from_binary(bytes: &[u8], expect_preamble: bool) -> binary::Result<Self> {
        Ok(Self::from_lines(binary::decode(bytes, expect_preamble)?))
    }

    /// Decodes `bytes` as strict UTF-8 and parses the result, the
    /// byte-level counterpart of [`parse_preserving`]/
    /// [`parse_non_preserving`] for callers reading a document straight
    /// from a file or socket rather than an already-decoded `&str`.
    ///
    /// [`parse_preserving`]: Document::parse_preserving
    /// [`parse_non_preserving`]: Document::parse_non_preserving
    pub fn parse_bytes(bytes: &[u8], preserving: bool) -> Result<Self> {
        let text = wsv_encoding::utf8_to_string(bytes).context(Utf8Snafu)?;
        let lines = if preserving {
            parser::parse_lines_preserving(&text, 0)
        } else {
            parser::parse_lines_non_preserving(&text, 0)
        }
        .context(ParseSnafu)?;
        Ok(Self::from_lines(lines))
    }

    /// Serializes the document and encodes the result as UTF-8 bytes,
    /// the byte-level counterpart of [`serialize`](Document::serialize).
    pub fn to_bytes(&self, preserving: bool) -> Vec<u8> {
        wsv_encoding::string_to_utf8(&self.serialize(preserving))
    }
}
