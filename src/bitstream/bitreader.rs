//! BitReader: reads a packed, MSB first bitstream from any I/O source that supports read().
//!
//! Used to pull a stored container apart field by field.
//!

use std::io;

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads bits from a byte source.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: io::Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more.
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer is used up
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // Adjust the buffer if we read less than the buffer size
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return the next n bits (n <= 64) as an integer, or None if the source runs dry first.
    pub fn bint(&mut self, mut n: usize) -> io::Result<Option<u64>> {
        /*
        Read as many bits as possible per step. First drain whatever is left of a partial
        byte, then take full bytes, then a final partial byte.
        */
        debug_assert!(n <= 64);
        let mut result = 0_u64;

        // Test if we have a partial byte of data. If we do, read from it.
        if self.bit_index > 0 && n > 0 {
            let needed = n.min(8 - self.bit_index);
            result = ((self.buffer[self.cursor] & BIT_MASK >> self.bit_index)
                >> (8 - self.bit_index - needed)) as u64;
            self.bit_index += needed;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.cursor += 1;
            }
            n -= needed;
        }
        // Full bytes
        while n >= 8 {
            if !self.have_data()? {
                return Ok(None);
            }
            result = result << 8 | self.buffer[self.cursor] as u64;
            self.cursor += 1;
            n -= 8;
        }
        // Whatever is still needed from the next byte
        if n > 0 {
            if !self.have_data()? {
                return Ok(None);
            }
            result = result << n | (self.buffer[self.cursor] >> (8 - n)) as u64;
            self.bit_index = n;
        }
        Ok(Some(result))
    }

    /// Returns a byte, or None if there is no more data to read.
    pub fn byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.bint(8)?.map(|byte| byte as u8))
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
