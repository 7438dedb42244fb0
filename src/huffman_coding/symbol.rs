use std::fmt::Debug;
use std::hash::Hash;

/// One unit of the input alphabet: a byte, a pixel sample, or a text character.
///
/// Each symbol type has a fixed serialized width so a code table can be written to a
/// container and read back without any extra framing.
pub trait Symbol: Copy + Eq + Hash + Ord + Debug + Send + Sync {
    /// Number of bits used to store one symbol in a container.
    const BITS: u8;
    /// Tag byte identifying the symbol type in a container header.
    const KIND: u8;

    /// The symbol as an unsigned integer of at most `BITS` bits.
    fn to_bits(self) -> u32;

    /// Rebuild a symbol from its stored bits. Returns None for values the type can't hold.
    fn from_bits(bits: u32) -> Option<Self>;
}

impl Symbol for u8 {
    const BITS: u8 = 8;
    const KIND: u8 = b'b';

    fn to_bits(self) -> u32 {
        self as u32
    }

    fn from_bits(bits: u32) -> Option<Self> {
        u8::try_from(bits).ok()
    }
}

impl Symbol for u16 {
    const BITS: u8 = 16;
    const KIND: u8 = b'w';

    fn to_bits(self) -> u32 {
        self as u32
    }

    fn from_bits(bits: u32) -> Option<Self> {
        u16::try_from(bits).ok()
    }
}

impl Symbol for char {
    // char::MAX is 0x10FFFF, which fits in 21 bits
    const BITS: u8 = 21;
    const KIND: u8 = b'c';

    fn to_bits(self) -> u32 {
        self as u32
    }

    fn from_bits(bits: u32) -> Option<Self> {
        char::from_u32(bits)
    }
}
