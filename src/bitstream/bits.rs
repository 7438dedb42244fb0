use std::fmt::{Display, Formatter};

use crate::error::{HuffError, Result};

/// An exact-length run of bits, packed MSB first. Trailing pad bits in the last byte are
/// always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitstream {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl Bitstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Used by BitPacker, which already guarantees the byte count and zero padding.
    pub(crate) fn from_parts(bytes: Vec<u8>, bit_len: usize) -> Self {
        Self { bytes, bit_len }
    }

    /// Wrap packed bytes holding `bit_len` bits. Pad bits beyond `bit_len` are cleared.
    pub fn from_packed(mut bytes: Vec<u8>, bit_len: usize) -> Result<Self> {
        if bytes.len() != (bit_len + 7) / 8 {
            return Err(HuffError::InvalidContainer(format!(
                "{} bytes cannot hold exactly {} bits",
                bytes.len(),
                bit_len
            )));
        }
        let rem = bit_len % 8;
        if rem > 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xff << (8 - rem);
            }
        }
        Ok(Self { bytes, bit_len })
    }

    /// Parse a string of '0' and '1' characters. Returns None on any other character.
    pub fn from_bit_str(s: &str) -> Option<Self> {
        let mut bytes = vec![0_u8; (s.len() + 7) / 8];
        for (i, c) in s.chars().enumerate() {
            match c {
                '0' => {}
                '1' => bytes[i / 8] |= 0x80 >> (i % 8),
                _ => return None,
            }
        }
        Some(Self {
            bytes,
            bit_len: s.len(),
        })
    }

    /// Number of bits in the stream.
    pub fn len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return the bit at `idx`, or None past the end.
    pub fn get(&self, idx: usize) -> Option<bool> {
        if idx >= self.bit_len {
            return None;
        }
        Some(self.bytes[idx / 8] & (0x80 >> (idx % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_len).filter_map(move |i| self.get(i))
    }

    /// Shorten the stream to `bit_len` bits. Does nothing if it is already that short.
    pub fn truncate(&mut self, bit_len: usize) {
        if bit_len >= self.bit_len {
            return;
        }
        self.bytes.truncate((bit_len + 7) / 8);
        let rem = bit_len % 8;
        if rem > 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xff << (8 - rem);
            }
        }
        self.bit_len = bit_len;
    }
}

impl Display for Bitstream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Bitstream;

    #[test]
    fn bit_str_test() {
        let bs = Bitstream::from_bit_str("1000000101").unwrap();
        assert_eq!(bs.len(), 10);
        assert_eq!(bs.as_bytes(), &[0b1000_0001, 0b0100_0000]);
        assert_eq!(bs.to_string(), "1000000101");
        assert!(Bitstream::from_bit_str("10x").is_none());
    }

    #[test]
    fn get_test() {
        let bs = Bitstream::from_bit_str("01").unwrap();
        assert_eq!(bs.get(0), Some(false));
        assert_eq!(bs.get(1), Some(true));
        assert_eq!(bs.get(2), None);
        assert_eq!(bs.iter().collect::<Vec<_>>(), [false, true]);
    }

    #[test]
    fn truncate_test() {
        let mut bs = Bitstream::from_bit_str("111111111").unwrap();
        bs.truncate(3);
        assert_eq!(bs.as_bytes(), &[0b1110_0000]);
        assert_eq!(bs.to_string(), "111");
        bs.truncate(10);
        assert_eq!(bs.len(), 3);
    }

    #[test]
    fn from_packed_test() {
        let bs = Bitstream::from_packed(vec![0xff], 2).unwrap();
        assert_eq!(bs.as_bytes(), &[0b1100_0000]);
        assert!(Bitstream::from_packed(vec![0xff, 0], 2).is_err());
        assert!(Bitstream::from_packed(vec![], 0).unwrap().is_empty());
    }
}
