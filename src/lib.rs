//! Huffman coding for bytes, pixel samples, and text.
//!
//! Builds a prefix code from the symbol counts of an input sequence, uses it to compress the
//! sequence into a bitstream, and decodes the bitstream back into the original sequence.
//! The code table and bitstream can be stored together in a small container so decoding
//! can happen in a separate process.
//!
//! Basic usage:
//!
//! ```
//! use huffpack::{compress, decode, MergeStrategy};
//!
//! let text = "aardvark".chars().collect::<Vec<_>>();
//! let out = compress(&text, MergeStrategy::Sorted)?;
//! assert!(out.metrics.bits_after < out.metrics.bits_before);
//! assert_eq!(decode(&out.table, &out.stream)?, text);
//! # Ok::<(), huffpack::HuffError>(())
//! ```
//!
//! From the command line, `$> huffpack -z notes.txt` writes `notes.txt.huf`.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use bitstream::bits::Bitstream;
pub use compression::container::{read_container, write_container, Container};
pub use compression::decode::decode;
pub use compression::encode::{compress, encode, CompressionMetrics, Compressed};
pub use error::{HuffError, Result};
pub use huffman_coding::code_table::{Code, CodeTable};
pub use huffman_coding::symbol::Symbol;
pub use huffman_coding::tree::{HuffmanTree, MergeStrategy};
pub use tools::freq_count::{freqs, SymbolCount};
