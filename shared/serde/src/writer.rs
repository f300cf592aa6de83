use log::error;

use crate::MAX_STRING_BYTES;

/// Append-only little-endian byte buffer.
///
/// Fields are written in a fixed order per message kind; a `ByteReader` on
/// the receiving side must consume them in the same order. The capacity
/// passed to `with_capacity` is a sizing hint, not a hard limit.
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn add_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn add_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn add_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn add_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn add_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Strings are length-prefixed: u16 byte length, then UTF-8 bytes.
    ///
    /// A string longer than `MAX_STRING_BYTES` is truncated at a char
    /// boundary and the truncation is logged; the format has no way to
    /// carry the full value.
    pub fn add_string(&mut self, value: &str) {
        let mut bytes = value.as_bytes();
        if bytes.len() > MAX_STRING_BYTES {
            error!(
                "add_string: {} byte string exceeds the u16 length prefix, truncating",
                bytes.len()
            );
            let mut end = MAX_STRING_BYTES;
            while end > 0 && !value.is_char_boundary(end) {
                end -= 1;
            }
            bytes = &bytes[..end];
        }
        self.buffer.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
        self.buffer.extend_from_slice(bytes);
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
