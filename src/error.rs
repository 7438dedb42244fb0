//! Error types for huffpack.

use thiserror::Error;

/// Everything that can go wrong while building, applying, or storing a Huffman code.
#[derive(Debug, Error)]
pub enum HuffError {
    /// The input sequence held no symbols, so no tree can be built.
    #[error("input is empty, cannot build a huffman code")]
    EmptyInput,

    /// A symbol being encoded has no entry in the code table.
    #[error("symbol {symbol} at position {position} is not in the code table")]
    UnknownSymbol { symbol: String, position: usize },

    /// The bitstream ended mid-code, or holds bits that can never match a code.
    #[error("malformed bitstream at bit {offset}: {pending} unmatched bit(s)")]
    MalformedStream { offset: usize, pending: usize },

    /// A leaf sits deeper than a code word can hold.
    #[error("code for symbol {symbol} needs {len} bits (maximum is 64)")]
    CodeTooLong { symbol: String, len: usize },

    /// A code table rebuilt from stored pairs is not a valid prefix code.
    #[error("invalid code table: {0}")]
    InvalidTable(String),

    /// A stored container could not be understood.
    #[error("invalid container: {0}")]
    InvalidContainer(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for huffpack operations.
pub type Result<T> = std::result::Result<T, HuffError>;
