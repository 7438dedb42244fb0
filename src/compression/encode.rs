use std::fmt::{Display, Formatter};

use log::info;

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bits::Bitstream;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::symbol::Symbol;
use crate::huffman_coding::tree::MergeStrategy;

/// Size of a sequence before and after coding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionMetrics {
    /// Bits a fixed width code over the same alphabet would need.
    pub bits_before: u64,
    /// Length of the coded bitstream.
    pub bits_after: u64,
    /// bits_before / bits_after
    pub ratio: f64,
}

impl CompressionMetrics {
    /// The fixed width baseline spends ceil(log2(distinct)) bits per symbol. A one symbol
    /// alphabet needs 0 bits per symbol, which makes both the baseline and the ratio 0.
    pub fn new(distinct: usize, symbols: usize, bits_after: usize) -> Self {
        let bits_before = fixed_width(distinct) as u64 * symbols as u64;
        let bits_after = bits_after as u64;
        let ratio = if bits_after == 0 {
            0.0
        } else {
            bits_before as f64 / bits_after as f64
        };
        CompressionMetrics {
            bits_before,
            bits_after,
            ratio,
        }
    }
}

impl Display for CompressionMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bits before compression: {}, bits after compression: {}, compression ratio: {:.4}",
            self.bits_before, self.bits_after, self.ratio
        )
    }
}

/// ceil(log2(n)), with 0 for n <= 1.
fn fixed_width(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// A sequence coded with its own table.
#[derive(Debug, Clone)]
pub struct Compressed<S: Symbol> {
    pub table: CodeTable<S>,
    pub stream: Bitstream,
    /// Length of the original sequence.
    pub symbols: usize,
    pub metrics: CompressionMetrics,
}

/// Build a code for `data` and encode `data` with it.
pub fn compress<S: Symbol>(data: &[S], strategy: MergeStrategy) -> Result<Compressed<S>> {
    let table = CodeTable::build(data, strategy)?;
    let stream = encode(&table, data)?;
    let metrics = CompressionMetrics::new(table.len(), data.len(), stream.len());
    info!("Encoding complete. {}", metrics);
    Ok(Compressed {
        table,
        stream,
        symbols: data.len(),
        metrics,
    })
}

/// Concatenate the code of every symbol in `data`, in order.
pub fn encode<S: Symbol>(table: &CodeTable<S>, data: &[S]) -> Result<Bitstream> {
    // Guess at an average of 4 bits per symbol
    let mut bp = BitPacker::new(data.len() / 2 + 1);
    for (position, symbol) in data.iter().enumerate() {
        match table.get(symbol) {
            Some(code) => bp.out_bits(code.bits(), code.len()),
            None => {
                return Err(HuffError::UnknownSymbol {
                    symbol: format!("{:?}", symbol),
                    position,
                })
            }
        }
    }
    Ok(bp.finish())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn aardvark_test() {
        let data = "aardvark".chars().collect::<Vec<_>>();
        let out = compress(&data, MergeStrategy::Sorted).unwrap();
        assert_eq!(out.stream.to_string(), "001011011110101110");
        assert_eq!(out.metrics.bits_before, 24);
        assert_eq!(out.metrics.bits_after, 18);
        assert!((out.metrics.ratio - 24.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_symbol_test() {
        let table = CodeTable::build(b"abc", MergeStrategy::Sorted).unwrap();
        match encode(&table, b"abxc") {
            Err(HuffError::UnknownSymbol { position, .. }) => assert_eq!(position, 2),
            other => panic!("expected UnknownSymbol, got {:?}", other),
        }
    }

    #[test]
    fn fixed_width_test() {
        assert_eq!(fixed_width(1), 0);
        assert_eq!(fixed_width(2), 1);
        assert_eq!(fixed_width(5), 3);
        assert_eq!(fixed_width(8), 3);
        assert_eq!(fixed_width(9), 4);
        assert_eq!(fixed_width(256), 8);
    }

    #[test]
    fn single_symbol_metrics_test() {
        let out = compress(&[0_u8; 4], MergeStrategy::Sorted).unwrap();
        assert_eq!(out.stream.to_string(), "0000");
        assert_eq!(out.metrics.bits_before, 0);
        assert_eq!(out.metrics.ratio, 0.0);
    }
}
