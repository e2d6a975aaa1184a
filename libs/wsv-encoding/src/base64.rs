//! Base64 helpers for embedding WSV fragments (or arbitrary binary payloads)
//! inline inside other textual formats.
//!
//! These are unrelated to the WSV grammar itself — nothing in [`wsv_core`]
//! calls into this module — but they round out the text-encoding
//! collaborator named in the design, following [`lettre`]'s pattern of
//! depending on the `base64` crate for this kind of incidental encoding
//! rather than hand-rolling it.
//!
//! [`wsv_core`]: https://docs.rs/wsv-core
//! [`lettre`]: https://docs.rs/lettre

use base64::{engine::general_purpose::STANDARD, Engine as _};
use snafu::{ResultExt, Snafu};

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("invalid base64 input: {source}"))]
    Decode { source: base64::DecodeError },
}

/// Encodes `bytes` as standard (RFC 4648) base64 with padding.
///
/// ```
/// use wsv_encoding::base64::base64_encode;
/// assert_eq!(base64_encode(b"hi"), "aGk=");
/// ```
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a standard (RFC 4648) base64 string.
///
/// ```
/// use wsv_encoding::base64::base64_decode;
/// assert_eq!(base64_decode("aGk=").unwrap(), b"hi");
/// ```
pub fn base64_decode(s: &str) -> Result<Vec<u8>> {
    STANDARD.decode(s).context(DecodeSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        for payload in [&b""[..], b"hi", b"\x00\x01\xfe\xff", b"a longer payload here"] {
            assert_eq!(base64_decode(&base64_encode(payload)).unwrap(), payload);
        }
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(base64_decode("not valid base64!!").is_err());
    }
}
