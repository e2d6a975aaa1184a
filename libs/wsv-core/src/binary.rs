//! Binary WSV: a compact, VarInt56-tagged encoding of the same line/value
//! model the textual format describes, intended for storage and wire
//! transfer rather than human editing.
//!
//! Every value is one VarInt56-tagged record: `0` marks a line break,
//! `1` a null value, `2` an empty string, and any value `>= 3` a UTF-8
//! payload of length `tag - 2` immediately following the tag. A document
//! may optionally be preceded by the 5-byte preamble `BWSV1`.

use snafu::{ensure, ResultExt, Snafu};
use tracing::trace;

use crate::line::Line;
use crate::varint56;

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

/// The 5-byte preamble every Binary WSV stream may begin with: the
/// ASCII magic `BWSV` followed by a single version byte.
pub const PREAMBLE: [u8; 5] = *b"BWSV1";
const MAGIC: &[u8; 4] = b"BWSV";
const VERSION: u8 = b'1';

const TAG_LINE_BREAK: u64 = 0;
const TAG_NULL: u64 = 1;
const TAG_EMPTY: u64 = 2;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("missing Binary WSV preamble"))]
    NoPreamble,

    #[snafu(display("unsupported Binary WSV version byte 0x{found:02x}"))]
    UnsupportedVersion { found: u8 },

    #[snafu(display(
        "cannot fully read string: need {needed} bytes at offset {offset}, have {available}"
    ))]
    CannotFullyReadString {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[snafu(display("string payload at offset {offset} is not valid UTF-8"))]
    InvalidUtf8Payload { offset: usize },

    #[snafu(display("VarInt56 tag decoding failed: {source}"))]
    VarInt { source: varint56::Error },
}

/// Encodes `lines` as Binary WSV, optionally prefixed with the
/// [`PREAMBLE`].
pub fn encode(lines: &[Line], include_preamble: bool) -> Result<Vec<u8>> {
    let mut buf = crate::buffer::ByteBuffer::new();
    if include_preamble {
        buf.push_slice(&PREAMBLE);
    }

    for (i, line) in lines.iter().enumerate() {
        for value in line.values() {
            match value {
                None => buf.push_varint56(TAG_NULL).context(VarIntSnafu)?,
                Some(s) if s.is_empty() => buf.push_varint56(TAG_EMPTY).context(VarIntSnafu)?,
                Some(s) => {
                    let bytes = s.as_bytes();
                    let tag = bytes.len() as u64 + 2;
                    buf.push_varint56(tag).context(VarIntSnafu)?;
                    buf.push_slice(bytes);
                }
            }
        }
        if i + 1 < lines.len() {
            buf.push_varint56(TAG_LINE_BREAK).context(VarIntSnafu)?;
        }
    }

    Ok(buf.into_vec())
}

/// Decodes Binary WSV into lines holding values only (Binary WSV never
/// carries whitespace layout or comments).
pub fn decode(bytes: &[u8], expect_preamble: bool) -> Result<Vec<Line>> {
    let mut offset = 0;
    if expect_preamble {
        ensure!(bytes.len() >= PREAMBLE.len(), NoPreambleSnafu);
        ensure!(&bytes[0..4] == MAGIC, NoPreambleSnafu);
        let version = bytes[4];
        ensure!(version == VERSION, UnsupportedVersionSnafu { found: version });
        offset = PREAMBLE.len();
    }

    let mut lines = vec![Line::new()];
    while offset < bytes.len() {
        let (tag, consumed) = varint56::decode(bytes, offset).context(VarIntSnafu)?;
        offset += consumed;
        match tag {
            TAG_LINE_BREAK => lines.push(Line::new()),
            TAG_NULL => lines.last_mut().unwrap().push_value(None),
            TAG_EMPTY => lines.last_mut().unwrap().push_value(Some(String::new())),
            n => {
                let str_len = (n - 2) as usize;
                ensure!(
                    offset + str_len <= bytes.len(),
                    CannotFullyReadStringSnafu {
                        offset,
                        needed: str_len,
                        available: bytes.len() - offset,
                    }
                );
                let payload = &bytes[offset..offset + str_len];
                let s = std::str::from_utf8(payload)
                    .map_err(|_| Error::InvalidUtf8Payload { offset })?;
                lines.last_mut().unwrap().push_value(Some(s.to_owned()));
                offset += str_len;
            }
        }
    }

    trace!(bytes = bytes.len(), lines = lines.len(), "decoded Binary WSV document");
    Ok(lines)
}
