//! Fixed-width payload blocks
//!
//! Every method's parameters occupy one block of [`PAYLOAD_WIDTH`] bytes.
//! Callback slots are 8-byte little-endian addresses (zero for no callback),
//! flags are single bytes. Unused trailing bytes stay zero.
//!
//! ```text
//! bookended     | before (8) | after (8) | ignore (1) |
//! boolean       | before (8) | after (8) | ignore (1) | if_non_zero (1) |
//! set-value     | before (8) | after (8) | ignore (1) | disallow (1) |
//! value         | before (8) | after (8) | ignore (1) | disallow (1) | if_zero (1) |
//! action        | action (8) |
//! ```

/// Width of one payload block
pub const PAYLOAD_WIDTH: usize = 24;

const FN_WIDTH: usize = 8;

/// Sequential writer over one block
pub struct BlockWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BlockWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Write a callback address, zero for none
    pub fn write_fn(&mut self, raw: Option<usize>) {
        let bytes = (raw.unwrap_or(0) as u64).to_le_bytes();
        self.write_bytes(&bytes);
    }

    pub fn write_flag(&mut self, flag: bool) {
        self.write_bytes(&[flag as u8]);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        debug_assert!(end <= self.buf.len(), "payload exceeds block width");
        if let Some(dst) = self.buf.get_mut(self.pos..end) {
            dst.copy_from_slice(bytes);
        }
        self.pos = end;
    }
}

/// Sequential reader over one block
///
/// Reads past the end yield zero, matching the zero-fill of a missing entry.
pub struct BlockReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Read a callback address, `None` for zero
    pub fn read_fn(&mut self) -> Option<usize> {
        let mut bytes = [0u8; FN_WIDTH];
        if let Some(src) = self.buf.get(self.pos..self.pos + FN_WIDTH) {
            bytes.copy_from_slice(src);
        }
        self.pos += FN_WIDTH;
        match u64::from_le_bytes(bytes) {
            0 => None,
            raw => Some(raw as usize),
        }
    }

    pub fn read_flag(&mut self) -> bool {
        let flag = self.buf.get(self.pos).copied().unwrap_or(0) != 0;
        self.pos += 1;
        flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_slot_layout() {
        let mut block = [0u8; PAYLOAD_WIDTH];
        let mut w = BlockWriter::new(&mut block);
        w.write_fn(Some(0x1122_3344));
        w.write_fn(None);
        w.write_flag(true);
        assert_eq!(w.position(), 17);
        assert_eq!(&block[..4], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&block[8..16], &[0; 8]);
        assert_eq!(block[16], 1);
    }

    #[test]
    fn test_reader_past_end_is_zero() {
        let block = [0xffu8; 4];
        let mut r = BlockReader::new(&block);
        assert_eq!(r.read_fn(), None);
        assert!(!r.read_flag());
    }
}
