use log::error;

use super::bits::Bitstream;

/// Packs bits MSB first into a byte buffer.
pub struct BitPacker {
    pub output: Vec<u8>,
    /// Bits written so far, including those still waiting in the queue.
    written: usize,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of the size specified (in bytes).
    /// Call flush() or finish() to move the last partial byte into the buffer.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            written: 0,
            queue: 0,
            q_bits: 0,
        }
    }

    /// Move every complete byte from the queue into the output buffer.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /*
    The queue never holds more than 7 bits between calls, so pushing at most 32 bits at a
    time can't overflow the u64. Longer values are split into 32 bit pieces, high piece
    first.
    */
    /// Writes the `len` least significant bits of `value`, most significant of those first.
    pub fn out_bits(&mut self, value: u64, len: u8) {
        let mut remaining = len.min(64);
        while remaining > 0 {
            let take = remaining.min(32);
            remaining -= take;
            let piece = (value >> remaining) & (u64::MAX >> (64 - take));
            self.queue <<= take; //shift queue by bit length
            self.queue |= piece; //add data portion to queue
            self.q_bits += take; //update depth of queue bits
            self.written += take as usize;
            self.write_stream();
        }
    }

    /// Puts a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.out_bits(bit as u64, 1);
    }

    /// Puts a byte on the stream.
    pub fn out8(&mut self, data: u8) {
        self.out_bits(data as u64, 8);
    }

    /// Puts a 32 bit word on the stream.
    pub fn out32(&mut self, data: u32) {
        self.out_bits(data as u64, 32);
    }

    /// Puts a 64 bit word on the stream.
    pub fn out64(&mut self, data: u64) {
        self.out_bits(data, 64);
    }

    /// Number of bits written so far.
    pub fn bit_count(&self) -> usize {
        self.written
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits. Returns how many padding bits were added.
    pub fn flush(&mut self) -> u8 {
        let mut padding = 0;
        if self.q_bits > 0 {
            padding = 8 - self.q_bits;
            self.queue <<= padding; //pad the queue with zeros
            self.q_bits += padding;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
        padding
    }

    /// Flush and hand the packed bits over as a Bitstream of exact length.
    pub fn finish(mut self) -> Bitstream {
        self.flush();
        Bitstream::from_parts(self.output, self.written)
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.written / 8, self.written % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitPacker;

    #[test]
    fn out8_test() {
        let mut bw = BitPacker::new(100);
        bw.out8(b'!');
        bw.out8(b' ');
        bw.flush();
        assert_eq!(bw.output, "! ".as_bytes());
    }

    #[test]
    fn out_bits_and_loc_test() {
        let mut bw = BitPacker::new(100);
        bw.out_bits(0b0010, 4);
        bw.out_bits(0b0001, 4);
        assert_eq!("[1.0]", &bw.loc());
        bw.out_bits(0b11, 2);
        assert_eq!("[1.2]", &bw.loc());
        assert_eq!(bw.flush(), 6);
        assert_eq!(bw.output, [33, 0b1100_0000]);
    }

    #[test]
    fn out32_test() {
        let mut bw = BitPacker::new(100);
        bw.out32(0b00100001_00100000_00100001_00100000);
        bw.flush();
        assert_eq!(bw.output, [33, 32, 33, 32]);
    }

    #[test]
    fn out64_unaligned_test() {
        let mut bw = BitPacker::new(100);
        bw.out_bit(true);
        bw.out64(u64::MAX);
        assert_eq!(bw.bit_count(), 65);
        assert_eq!(bw.flush(), 7);
        assert_eq!(bw.output, [0xff; 8].iter().copied().chain([0x80]).collect::<Vec<u8>>());
    }

    #[test]
    fn finish_test() {
        let mut bw = BitPacker::new(1);
        bw.out_bits(0b101, 3);
        let stream = bw.finish();
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.as_bytes(), &[0b1010_0000]);
    }
}
