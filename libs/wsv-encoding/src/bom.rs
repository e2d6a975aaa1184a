//! Byte-order-mark sniffing and BOM-aware decoding.
//!
//! WSV documents are always text; this module exists for callers that read
//! a document from an arbitrary byte source (a file, a socket) and don't
//! yet know which of the handful of common Unicode transfer encodings it
//! was written in.

use snafu::{ResultExt, Snafu};
use tracing::trace;

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("truncated {encoding} input: {len} bytes is not a whole number of code units"))]
    TruncatedInput { encoding: &'static str, len: usize },

    #[snafu(display("lone UTF-16 surrogate 0x{code:04x} at code unit {index}"))]
    LoneSurrogate { code: u16, index: usize },

    #[snafu(display("code point 0x{code:08x} at index {index} is not a valid Unicode scalar value"))]
    InvalidScalarValue { code: u32, index: usize },

    #[snafu(display("invalid UTF-8 body following BOM: {source}"))]
    Utf8Body { source: super::utf8::Error },
}

/// A detected Unicode byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bom {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Bom {
    /// Length in bytes of this BOM's encoded form.
    pub fn len(self) -> usize {
        match self {
            Bom::Utf8 => 3,
            Bom::Utf16Le | Bom::Utf16Be => 2,
            Bom::Utf32Le | Bom::Utf32Be => 4,
        }
    }
}

/// Sniffs a byte-order mark at the start of `bytes`.
///
/// UTF-32LE's BOM (`FF FE 00 00`) is a strict superset of UTF-16LE's
/// (`FF FE`), so the longer match is checked first.
///
/// ```
/// use wsv_encoding::bom::{detect_bom, Bom};
/// assert_eq!(detect_bom(b"\xEF\xBB\xBFhello"), Some(Bom::Utf8));
/// assert_eq!(detect_bom(b"\xFF\xFE\x00\x00x"), Some(Bom::Utf32Le));
/// assert_eq!(detect_bom(b"\xFF\xFEx"), Some(Bom::Utf16Le));
/// assert_eq!(detect_bom(b"plain text"), None);
/// ```
pub fn detect_bom(bytes: &[u8]) -> Option<Bom> {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some(Bom::Utf8)
    } else if bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        Some(Bom::Utf32Be)
    } else if bytes.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        Some(Bom::Utf32Le)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        Some(Bom::Utf16Be)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        Some(Bom::Utf16Le)
    } else {
        None
    }
}

/// Decodes `bytes` into a native `String`, sniffing (and stripping) a
/// leading BOM first. Falls back to strict UTF-8 if no BOM is present.
pub fn decode_with_bom(bytes: &[u8]) -> Result<String> {
    match detect_bom(bytes) {
        Some(Bom::Utf8) => {
            trace!(bom = ?Bom::Utf8, "stripping detected byte-order mark");
            super::utf8::utf8_to_string(&bytes[Bom::Utf8.len()..]).context(Utf8BodySnafu)
        }
        Some(bom) => {
            trace!(?bom, "stripping detected byte-order mark");
            decode_wide(bom, &bytes[bom.len()..])
        }
        None => super::utf8::utf8_to_string(bytes).context(Utf8BodySnafu),
    }
}

fn decode_wide(bom: Bom, body: &[u8]) -> Result<String> {
    match bom {
        Bom::Utf16Le | Bom::Utf16Be => decode_utf16(body, bom == Bom::Utf16Le),
        Bom::Utf32Le | Bom::Utf32Be => decode_utf32(body, bom == Bom::Utf32Le),
        Bom::Utf8 => unreachable!("UTF-8 is handled by the caller before reaching decode_wide"),
    }
}

fn decode_utf16(body: &[u8], little_endian: bool) -> Result<String> {
    if body.len() % 2 != 0 {
        return TruncatedInputSnafu {
            encoding: "UTF-16",
            len: body.len(),
        }
        .fail();
    }

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            let arr = [pair[0], pair[1]];
            if little_endian {
                u16::from_le_bytes(arr)
            } else {
                u16::from_be_bytes(arr)
            }
        })
        .collect();

    char::decode_utf16(units.iter().copied())
        .enumerate()
        .map(|(index, r)| {
            r.map_err(|e| Error::LoneSurrogate {
                code: e.unpaired_surrogate(),
                index,
            })
        })
        .collect()
}

fn decode_utf32(body: &[u8], little_endian: bool) -> Result<String> {
    if body.len() % 4 != 0 {
        return TruncatedInputSnafu {
            encoding: "UTF-32",
            len: body.len(),
        }
        .fail();
    }

    body.chunks_exact(4)
        .enumerate()
        .map(|(index, quad)| {
            let arr = [quad[0], quad[1], quad[2], quad[3]];
            let code = if little_endian {
                u32::from_le_bytes(arr)
            } else {
                u32::from_be_bytes(arr)
            };
            char::from_u32(code).ok_or(Error::InvalidScalarValue { code, index })
        })
        .collect()
}
