//! Strict UTF-8 conversion between byte buffers and native strings.
//!
//! Unlike a lossy decoder, [`utf8_to_string`] never silently substitutes a
//! replacement character: the WSV grammar's surrogate-pairing rules need to
//! see exactly the bytes that were on disk, so a malformed sequence is
//! reported rather than patched over.

use snafu::Snafu;

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("invalid UTF-8 byte sequence at offset {offset}"))]
    InvalidUtf8 { offset: usize },
}

/// Decodes a UTF-8 byte buffer into a native `String`.
///
/// ```
/// use wsv_encoding::utf8::utf8_to_string;
/// assert_eq!(utf8_to_string(b"hello").unwrap(), "hello");
/// assert!(utf8_to_string(b"\xff\xfe").is_err());
/// ```
pub fn utf8_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| Error::InvalidUtf8 {
            offset: e.valid_up_to(),
        })
}

/// Encodes a native `String` into its UTF-8 byte representation.
///
/// A Rust `str` is always valid UTF-8 already, so this is an infallible
/// copy — kept as its own function so call sites never reach for
/// `s.as_bytes().to_vec()` directly and the seam stays swappable.
///
/// ```
/// use wsv_encoding::utf8::string_to_utf8;
/// assert_eq!(string_to_utf8("hello"), b"hello");
/// ```
pub fn string_to_utf8(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}
