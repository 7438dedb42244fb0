//! The bitstream module forms the bit level I/O layer for huffpack.
//!
//! Codes are variable length and never byte aligned, so everything that leaves the encoder
//! goes through the BitPacker, and everything read back from a container goes through the
//! BitReader. Bits are always MSB first.
//!
//! - bits: the in-memory Bitstream the encoder produces and the decoder consumes.
//! - bitpacker: packs values of 1-64 bits into bytes.
//! - bitreader: reads values of 1-64 bits from any `Read` source.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bits;
