/// Stateful cursor over a received payload.
///
/// Reading past the end never panics: the reader latches into an invalid
/// state and every subsequent read returns the zero value, so a truncated
/// or malformed payload degrades to defaults instead of crashing the peer.
/// Callers check `is_valid` after consuming the final field.
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
    valid: bool,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            valid: !data.is_empty(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes_remaining(&self) -> usize {
        if self.valid {
            self.data.len() - self.position
        } else {
            0
        }
    }

    pub fn next_u8(&mut self) -> u8 {
        if !self.validate(1) {
            return 0;
        }
        let value = self.data[self.position];
        self.position += 1;
        value
    }

    pub fn next_u16(&mut self) -> u16 {
        if !self.validate(2) {
            return 0;
        }
        let value = u16::from_le_bytes([self.data[self.position], self.data[self.position + 1]]);
        self.position += 2;
        value
    }

    pub fn next_i16(&mut self) -> i16 {
        self.next_u16() as i16
    }

    pub fn next_i32(&mut self) -> i32 {
        if !self.validate(4) {
            return 0;
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.position..self.position + 4]);
        self.position += 4;
        i32::from_le_bytes(bytes)
    }

    pub fn next_f32(&mut self) -> f32 {
        if !self.validate(4) {
            return 0.0;
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.position..self.position + 4]);
        self.position += 4;
        f32::from_le_bytes(bytes)
    }

    /// Reads a u16 length prefix, then that many UTF-8 bytes. Invalid UTF-8
    /// decodes lossily rather than invalidating the reader; a zero-length
    /// string is a valid read.
    pub fn next_string(&mut self) -> String {
        let length = self.next_u16() as usize;
        if !self.validate(length) {
            return String::new();
        }
        let value =
            String::from_utf8_lossy(&self.data[self.position..self.position + length]).into_owned();
        self.position += length;
        value
    }

    /// Fixed arrays carry no length on the wire; `length` comes from the
    /// message layout.
    pub fn next_bytes(&mut self, length: usize) -> Vec<u8> {
        if !self.validate(length) {
            return Vec::new();
        }
        let value = self.data[self.position..self.position + length].to_vec();
        self.position += length;
        value
    }

    pub fn next_i32_array(&mut self, length: usize) -> Vec<i32> {
        if !self.validate(length * 4) {
            return Vec::new();
        }
        (0..length).map(|_| self.next_i32()).collect()
    }

    pub fn next_f32_array(&mut self, length: usize) -> Vec<f32> {
        if !self.validate(length * 4) {
            return Vec::new();
        }
        (0..length).map(|_| self.next_f32()).collect()
    }

    fn validate(&mut self, byte_count: usize) -> bool {
        if !self.valid || self.position + byte_count > self.data.len() {
            self.valid = false;
            return false;
        }
        true
    }
}
