//! A small growable byte buffer used while assembling a Binary WSV
//! encoding, saving callers from hand-rolling `Vec<u8>` bookkeeping for
//! the mix of raw bytes and VarInt56 tags a document encodes to.

use crate::varint56;

#[derive(Debug, Default)]
pub struct ByteBuffer {
    data: Vec<u8>,
}

impl ByteBuffer {
    pub fn new() -> Self {
        ByteBuffer { data: Vec::with_capacity(4096) }
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.data.push(byte);
    }

    pub fn push_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn push_varint56(&mut self, n: u64) -> varint56::Result<()> {
        let mut tmp = [0u8; 9];
        let len = varint56::encode_into(n, &mut tmp, 0)?;
        self.data.extend_from_slice(&tmp[..len]);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_bytes_and_varints_in_order() {
        let mut buf = ByteBuffer::new();
        buf.push_byte(0x01);
        buf.push_slice(b"hi");
        buf.push_varint56(64).unwrap();
        assert_eq!(buf.as_slice(), &[0x01, b'h', b'i', 0x02, 0x02]);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn empty_buffer_reports_empty() {
        assert!(ByteBuffer::new().is_empty());
    }
}
