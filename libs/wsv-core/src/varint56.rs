//! VarInt56: a variable-length encoding for unsigned integers in
//! `0..=2^56-1`, used as the record-length tag in Binary WSV.
//!
//! The first byte's lowest set bit among its low 7 bits signals how
//! many bytes the value occupies (1 through 7); if none of those bits
//! are set, the value spills into the fixed 9-byte form. There is no
//! 8-byte form — encoders always produce the shortest representation,
//! and decoders reject anything else as non-canonical.

use snafu::{ensure, Snafu};
use tracing::warn;

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

/// The largest value a VarInt56 can represent: `2^56 - 1`.
pub const MAX: u64 = (1u64 << 56) - 1;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum Error {
    #[snafu(display("invalid VarInt56 encoding at byte offset {offset}"))]
    InvalidVarInt { offset: usize },

    #[snafu(display("value {value} exceeds the VarInt56 range (0..=2^56-1)"))]
    ValueOutOfRange { value: u64 },

    #[snafu(display(
        "offset {offset} leaves insufficient room for a VarInt56 (need {needed} bytes, have {length})"
    ))]
    BufferOutOfRange {
        offset: usize,
        needed: usize,
        length: usize,
    },

    #[snafu(display("value {value} does not fit in the requested integer width"))]
    NotSupported { value: u64 },
}

/// Cumulative bit capacity of the 1..=7 byte forms, indexed by `t`
/// (`t = length - 1`): `capacity(t) = 6 + 6*t`.
const CAPACITY: [u32; 7] = [6, 12, 18, 24, 30, 36, 42];

fn bit_length(n: u64) -> u32 {
    if n == 0 {
        0
    } else {
        64 - n.leading_zeros()
    }
}

/// Returns the number of bytes the shortest encoding of `n` occupies.
pub fn shortest_length(n: u64) -> Result<u8> {
    ensure!(n <= MAX, ValueOutOfRangeSnafu { value: n });
    let bits = bit_length(n);
    for (t, cap) in CAPACITY.iter().enumerate() {
        if bits <= *cap {
            return Ok(t as u8 + 1);
        }
    }
    Ok(9)
}

/// Encodes `n` into its shortest VarInt56 form.
pub fn encode(n: u64) -> Result<Vec<u8>> {
    let mut buf = [0u8; 9];
    let len = encode_into(n, &mut buf, 0)?;
    Ok(buf[..len].to_vec())
}

/// Encodes `n` into `buf` starting at `offset`, returning the number of
/// bytes written.
pub fn encode_into(n: u64, buf: &mut [u8], offset: usize) -> Result<usize> {
    ensure!(n <= MAX, ValueOutOfRangeSnafu { value: n });
    let len = shortest_length(n)? as usize;
    ensure!(
        offset + len <= buf.len(),
        BufferOutOfRangeSnafu {
            offset,
            needed: len,
            length: buf.len()
        }
    );

    if len == 9 {
        buf[offset] = 0;
        let mut remaining = n;
        for i in 0..8 {
            buf[offset + 1 + i] = (remaining & 0x7F) as u8;
            remaining >>= 7;
        }
    } else {
        let t = (len - 1) as u32;
        let low_bits = 6 - t;
        let tag = 1u8 << t;
        let value_part0 = (n & ((1u64 << low_bits) - 1)) as u8;
        buf[offset] = tag | (value_part0 << (t + 1));
        let mut remaining = n >> low_bits;
        for i in 0..t as usize {
            buf[offset + 1 + i] = (remaining & 0x7F) as u8;
            remaining >>= 7;
        }
    }
    Ok(len)
}

/// Encodes `n` as a string of code points in `0..128`, one per byte of
/// the encoding — convenient for embedding a VarInt56 directly inside a
/// textual representation.
pub fn encode_as_string(n: u64) -> Result<String> {
    let bytes = encode(n)?;
    Ok(bytes.into_iter().map(|b| b as char).collect())
}

/// Reads just enough of `bytes` at `offset` to determine how many bytes
/// the VarInt56 there occupies, without decoding its value.
pub fn length_from_first_byte(bytes: &[u8], offset: usize) -> Result<u8> {
    ensure!(
        offset < bytes.len(),
        BufferOutOfRangeSnafu {
            offset,
            needed: 1usize,
            length: bytes.len()
        }
    );
    let byte0 = bytes[offset];
    ensure!(byte0 & 0x80 == 0, InvalidVarIntSnafu { offset });
    let low7 = byte0 & 0x7F;
    if low7 == 0 {
        Ok(9)
    } else {
        Ok(low7.trailing_zeros() as u8 + 1)
    }
}

/// Decodes a VarInt56 from `bytes` at `offset`, returning its value and
/// the number of bytes consumed.
///
/// A successfully decoded value that is not in its shortest form is
/// still accepted (the format only rejects structurally invalid
/// encodings), but is logged at `warn` level: a conforming encoder
/// never produces one.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(u64, usize)> {
    ensure!(
        offset < bytes.len(),
        BufferOutOfRangeSnafu {
            offset,
            needed: 1usize,
            length: bytes.len()
        }
    );
    let byte0 = bytes[offset];
    ensure!(byte0 & 0x80 == 0, InvalidVarIntSnafu { offset });
    let low7 = byte0 & 0x7F;

    let (value, len) = if low7 == 0 {
        let len = 9usize;
        ensure!(
            offset + len <= bytes.len(),
            BufferOutOfRangeSnafu {
                offset,
                needed: len,
                length: bytes.len()
            }
        );
        let mut value: u64 = 0;
        for i in 0..8 {
            let b = bytes[offset + 1 + i];
            ensure!(
                b & 0x80 == 0,
                InvalidVarIntSnafu {
                    offset: offset + 1 + i
                }
            );
            value |= (b as u64) << (7 * i);
        }
        (value, len)
    } else {
        let t = low7.trailing_zeros();
        let len = (t + 1) as usize;
        ensure!(
            offset + len <= bytes.len(),
            BufferOutOfRangeSnafu {
                offset,
                needed: len,
                length: bytes.len()
            }
        );
        let low_bits = 6 - t;
        let mut value: u64 = (byte0 >> (t + 1)) as u64;
        let mut shift = low_bits;
        for i in 0..t as usize {
            let b = bytes[offset + 1 + i];
            ensure!(
                b & 0x80 == 0,
                InvalidVarIntSnafu {
                    offset: offset + 1 + i
                }
            );
            value |= (b as u64 & 0x7F) << shift;
            shift += 7;
        }
        (value, len)
    };

    if let Ok(canonical_len) = shortest_length(value) {
        if canonical_len as usize != len {
            warn!(offset, value, len, canonical_len, "non-canonical VarInt56 encoding");
        }
    }

    Ok((value, len))
}

/// Decodes a VarInt56 and narrows it to `u32`, surfacing
/// [`Error::NotSupported`] instead of truncating if it doesn't fit —
/// the behavior a platform lacking a native 56-bit integer type should
/// show its callers.
pub fn decode_u32(bytes: &[u8], offset: usize) -> Result<(u32, usize)> {
    let (value, len) = decode(bytes, offset)?;
    let narrowed = u32::try_from(value).map_err(|_| Error::NotSupported { value })?;
    Ok((narrowed, len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn encodes_documented_boundary_values() {
        assert_eq!(encode(0).unwrap(), vec![0x01]);
        assert_eq!(encode(63).unwrap(), vec![0x7F]);
        assert_eq!(encode(64).unwrap(), vec![0x02, 0x02]);
        assert_eq!(encode(MAX).unwrap()[0], 0x00);
        assert_eq!(encode(MAX).unwrap().len(), 9);
    }

    #[test]
    fn rejects_values_above_max() {
        assert!(matches!(
            encode(MAX + 1).unwrap_err(),
            Error::ValueOutOfRange { value } if value == MAX + 1
        ));
    }

    #[test]
    fn round_trips_across_every_length_tier() {
        let samples = [
            0u64,
            1,
            63,
            64,
            4095,
            4096,
            262_143,
            262_144,
            16_777_215,
            16_777_216,
            1_073_741_823,
            1_073_741_824,
            68_719_476_735,
            68_719_476_736,
            4_398_046_511_103,
            4_398_046_511_104,
            MAX,
        ];
        for &n in &samples {
            let bytes = encode(n).unwrap();
            let (decoded, len) = decode(&bytes, 0).unwrap();
            assert_eq!(decoded, n);
            assert_eq!(len, bytes.len());
            assert_eq!(shortest_length(n).unwrap() as usize, bytes.len());
        }
    }

    #[test]
    fn skips_the_8_byte_form() {
        // 42 bits is the largest value encodable in 7 bytes; one bit
        // more must jump straight to the 9-byte form.
        assert_eq!(shortest_length((1 << 42) - 1).unwrap(), 7);
        assert_eq!(shortest_length(1 << 42).unwrap(), 9);
    }

    #[test]
    fn high_bit_set_is_invalid() {
        let err = decode(&[0x80], 0).unwrap_err();
        assert!(matches!(err, Error::InvalidVarInt { offset: 0 }));
    }

    #[test]
    fn truncated_encoding_is_invalid() {
        let err = decode(&[0x02], 0).unwrap_err();
        assert!(matches!(err, Error::BufferOutOfRange { .. }));
    }

    #[test]
    fn length_from_first_byte_matches_decode() {
        for n in [0u64, 63, 64, MAX] {
            let bytes = encode(n).unwrap();
            assert_eq!(
                length_from_first_byte(&bytes, 0).unwrap() as usize,
                bytes.len()
            );
        }
    }

    #[test]
    fn encode_as_string_uses_one_char_per_byte() {
        let s = encode_as_string(64).unwrap();
        assert_eq!(s.chars().count(), 2);
        assert!(s.chars().all(|c| (c as u32) < 128));
    }

    #[test]
    fn decode_u32_narrows_or_reports_not_supported() {
        let bytes = encode(64).unwrap();
        assert_eq!(decode_u32(&bytes, 0).unwrap(), (64, 2));

        let bytes = encode(MAX).unwrap();
        assert!(matches!(
            decode_u32(&bytes, 0).unwrap_err(),
            Error::NotSupported { .. }
        ));
    }

    #[test]
    fn non_canonical_encoding_still_decodes() {
        // 0 re-encoded in the 2-byte form instead of its canonical
        // 1-byte form: tag bit 1 set, zero payload.
        let bytes = [0x02, 0x00];
        let (value, len) = decode(&bytes, 0).unwrap();
        assert_eq!(value, 0);
        assert_eq!(len, 2);
    }

    #[test]
    #[traced_test]
    fn non_canonical_encoding_logs_a_warning() {
        decode(&[0x02, 0x00], 0).unwrap();
        assert!(logs_contain("non-canonical VarInt56 encoding"));
    }
}
