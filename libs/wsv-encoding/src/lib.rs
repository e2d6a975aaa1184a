//! # Purpose:
//! Text-encoding collaborator for `wsv-core`.
//!
//! This crate is deliberately kept outside of the WSV grammar itself: it
//! owns everything the core parser/serializer treats as "somebody else's
//! problem" — turning a byte stream into a native `String` (and back),
//! sniffing a byte-order mark, and joining rendered lines with the
//! format's line terminator.
//!
//! # Topics:
//! - [utf8] - strict UTF-8 conversion, the seam `wsv-core` uses directly
//! - [bom] - byte-order-mark sniffing and BOM-aware decoding
//! - [base64] - inline-embedding helpers, unrelated to the WSV grammar
//! - [join_lines] - the line-terminator join used by document serialization

pub mod base64;
pub mod bom;
pub mod utf8;

pub use bom::Bom;
pub use utf8::{string_to_utf8, utf8_to_string};

/// Joins rendered lines with the WSV line terminator (`U+000A`), never a
/// platform-specific CRLF.
///
/// This is the only place a multi-line WSV document's line separator is
/// chosen; the core crate's serializer renders lines individually and
/// hands the result here.
///
/// ```
/// use wsv_encoding::join_lines;
/// assert_eq!(join_lines(&["a", "b", "c"]), "a\nb\nc");
/// assert_eq!(join_lines(&[] as &[&str]), "");
/// ```
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut result = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            result.push('\n');
        }
        result.push_str(line.as_ref());
    }
    result
}
