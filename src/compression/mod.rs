//! The compression module applies a Huffman code to a sequence and takes it back off again.
//!
//! Compression happens in the following steps:
//! - Frequency count: how often each distinct symbol occurs.
//! - Tree build: join the two lightest nodes until one root remains.
//! - Code table: read each symbol's code off the path from the root to its leaf.
//! - Encode: concatenate the code of every symbol into one bitstream.
//! - Store (optional): write the code table and bitstream to a container.
//!
//! Decompression reads the container, rebuilds the code to symbol index from the stored
//! table, and scans the bitstream left to right, emitting a symbol each time the bits
//! collected so far form a complete code.
//!
//! Both directions are single threaded; each step depends on the one before.
//!

pub mod compress;
pub mod container;
pub mod decode;
pub mod decompress;
pub mod encode;
