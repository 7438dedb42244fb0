//! Code table generation.
//!
//! Each leaf's code is read by walking parent links up to the root: a step up from a left
//! child is a 0, from a right child a 1. The walk runs leaf to root, so the first step is
//! the last bit of the code.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::{debug, log_enabled, Level};
use rustc_hash::FxHashMap;

use super::symbol::Symbol;
use super::tree::{HuffmanTree, MergeStrategy};
use crate::error::{HuffError, Result};
use crate::tools::freq_count::SymbolCount;

/// Longest code a table can hold.
pub const MAX_CODE_LEN: u8 = 64;

/// A prefix code word of 1 to 64 bits, right aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// A code of `len` bits. None if the length is out of range or `bits` doesn't fit.
    pub fn new(bits: u64, len: u8) -> Option<Self> {
        if len == 0 || len > MAX_CODE_LEN {
            return None;
        }
        if len < 64 && bits >> len != 0 {
            return None;
        }
        Some(Code { bits, len })
    }

    /// Candidate codes in the decoder may be empty.
    pub(crate) fn raw(bits: u64, len: u8) -> Self {
        Code { bits, len }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of bits in the code, never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// True if `self` is a prefix of `other`, or equal to it.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    /// Bits moved to the top of a u64, for lexicographic ordering.
    fn aligned(&self) -> u64 {
        if self.len == 0 {
            0
        } else {
            self.bits << (64 - self.len)
        }
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            f.write_str(if (self.bits >> i) & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = HuffError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.len() > MAX_CODE_LEN as usize {
            return Err(HuffError::InvalidTable(format!(
                "code '{}' must hold 1 to {} bits",
                s, MAX_CODE_LEN
            )));
        }
        let mut bits = 0_u64;
        for c in s.chars() {
            bits = match c {
                '0' => bits << 1,
                '1' => bits << 1 | 1,
                _ => {
                    return Err(HuffError::InvalidTable(format!(
                        "code '{}' holds something other than 0 and 1",
                        s
                    )))
                }
            };
        }
        Ok(Code {
            bits,
            len: s.len() as u8,
        })
    }
}

/// Bijective map from symbols to prefix free codes. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    codes: FxHashMap<S, Code>,
    max_len: u8,
}

impl<S: Symbol> CodeTable<S> {
    /// Count, build the tree, and read off the codes in one go.
    pub fn build(data: &[S], strategy: MergeStrategy) -> Result<Self> {
        let tree = HuffmanTree::build(data, strategy)?;
        Self::from_tree(&tree)
    }

    /// Walk every leaf up to the root to read its code.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Result<Self> {
        let root = tree.root();
        let mut codes = FxHashMap::default();
        codes.reserve(tree.locations().len());

        for (&symbol, &leaf) in tree.locations() {
            // A lone leaf is its own root. No merge happened, so give it a single 0 bit.
            if leaf == root {
                codes.insert(symbol, Code { bits: 0, len: 1 });
                continue;
            }

            let mut bits = 0_u64;
            let mut len = 0_usize;
            let mut current = leaf;
            while let Some(parent) = tree.node(current).parent {
                if len == MAX_CODE_LEN as usize {
                    return Err(HuffError::CodeTooLong {
                        symbol: format!("{:?}", symbol),
                        len: tree.depth(leaf),
                    });
                }
                // Filling from the low end reverses the leaf-to-root order for free
                if tree.node(parent).right == Some(current) {
                    bits |= 1_u64 << len;
                }
                len += 1;
                current = parent;
            }
            codes.insert(
                symbol,
                Code {
                    bits,
                    len: len as u8,
                },
            );
        }

        let table = Self::with_codes(codes);
        debug!(
            "Generated {} codes, longest is {} bits.",
            table.len(),
            table.max_len
        );
        if log_enabled!(Level::Debug) {
            debug!("{}", table);
        }
        Ok(table)
    }

    /// Rebuild a table from stored (symbol, code) pairs, checking it is a valid prefix code.
    pub fn from_codes(pairs: impl IntoIterator<Item = (S, Code)>) -> Result<Self> {
        let mut codes = FxHashMap::default();
        for (symbol, code) in pairs {
            if code.len == 0 || code.len > MAX_CODE_LEN {
                return Err(HuffError::InvalidTable(format!(
                    "code for {:?} has length {}",
                    symbol, code.len
                )));
            }
            if codes.insert(symbol, code).is_some() {
                return Err(HuffError::InvalidTable(format!(
                    "symbol {:?} appears twice",
                    symbol
                )));
            }
        }
        if codes.is_empty() {
            return Err(HuffError::InvalidTable("no codes".to_string()));
        }
        let table = Self::with_codes(codes);
        if let Some((a, b)) = table.prefix_violation() {
            return Err(HuffError::InvalidTable(format!(
                "code {} is a prefix of {}",
                a, b
            )));
        }
        Ok(table)
    }

    fn with_codes(codes: FxHashMap<S, Code>) -> Self {
        let max_len = codes.values().map(|c| c.len).max().unwrap_or(0);
        CodeTable { codes, max_len }
    }

    pub fn get(&self, symbol: &S) -> Option<Code> {
        self.codes.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &Code)> {
        self.codes.iter()
    }

    /// All entries ordered by symbol.
    pub fn sorted(&self) -> Vec<(S, Code)> {
        let mut entries = self.codes.iter().map(|(&s, &c)| (s, c)).collect::<Vec<_>>();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries
    }

    /// Code to symbol lookup used by the decoder.
    pub fn reverse_index(&self) -> FxHashMap<Code, S> {
        self.codes.iter().map(|(&s, &c)| (c, s)).collect()
    }

    /// Total bits needed to encode symbols with these counts. None if a symbol has no code.
    pub fn encoded_len(&self, counts: &[SymbolCount<S>]) -> Option<u64> {
        counts.iter().try_fold(0_u64, |total, c| {
            self.get(&c.symbol).map(|code| total + c.count * code.len as u64)
        })
    }

    pub fn is_prefix_free(&self) -> bool {
        self.prefix_violation().is_none()
    }

    /// Find a code that is a prefix of (or equal to) another code.
    fn prefix_violation(&self) -> Option<(Code, Code)> {
        // In lexicographic order a prefix always sits right before one of its extensions
        let mut sorted = self.codes.values().copied().collect::<Vec<_>>();
        sorted.sort_unstable_by_key(|c| (c.aligned(), c.len));
        sorted
            .windows(2)
            .find(|pair| pair[0].is_prefix_of(&pair[1]))
            .map(|pair| (pair[0], pair[1]))
    }
}

/// Lists the table as symbol=code pairs in symbol order.
impl<S: Symbol> Display for CodeTable<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let listing = self
            .sorted()
            .into_iter()
            .map(|(s, c)| format!("{:?}={}", s, c))
            .collect::<Vec<_>>();
        write!(f, "{}", listing.join(" "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn aardvark_codes_test() {
        let data = "aardvark".chars().collect::<Vec<_>>();
        let table = CodeTable::build(&data, MergeStrategy::Sorted).unwrap();
        let rendered = table
            .sorted()
            .into_iter()
            .map(|(s, c)| format!("{}={}", s, c))
            .collect::<Vec<_>>();
        assert_eq!(rendered, ["a=0", "d=110", "k=1110", "r=10", "v=1111"]);
        assert_eq!(table.to_string(), "'a'=0 'd'=110 'k'=1110 'r'=10 'v'=1111");
        assert_eq!(table.max_len(), 4);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn single_symbol_code_test() {
        let table = CodeTable::build(&[7_u8; 4], MergeStrategy::Heap).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&7), Some(code("0")));
    }

    #[test]
    fn code_parse_test() {
        let c = code("0110");
        assert_eq!(c.bits(), 0b0110);
        assert_eq!(c.len(), 4);
        assert_eq!(c.to_string(), "0110");
        assert!("".parse::<Code>().is_err());
        assert!("012".parse::<Code>().is_err());
        assert!(Code::new(0b100, 2).is_none());
        assert!(Code::new(0, 65).is_none());
        assert!(Code::new(u64::MAX, 64).is_some());
    }

    #[test]
    fn prefix_test() {
        assert!(code("01").is_prefix_of(&code("011")));
        assert!(code("01").is_prefix_of(&code("01")));
        assert!(!code("011").is_prefix_of(&code("01")));
        assert!(!code("00").is_prefix_of(&code("01")));
    }

    #[test]
    fn from_codes_test() {
        let table = CodeTable::from_codes([(b'a', code("0")), (b'b', code("10")), (b'c', code("11"))])
            .unwrap();
        assert_eq!(table.get(&b'b'), Some(code("10")));
        assert_eq!(table.reverse_index().get(&code("11")), Some(&b'c'));

        // "1" is a prefix of "10"
        let bad = CodeTable::from_codes([(b'a', code("1")), (b'b', code("10"))]);
        assert!(matches!(bad, Err(HuffError::InvalidTable(_))));
        // two symbols, one code
        let bad = CodeTable::from_codes([(b'a', code("0")), (b'b', code("0"))]);
        assert!(matches!(bad, Err(HuffError::InvalidTable(_))));
        // one symbol, two codes
        let bad = CodeTable::from_codes([(b'a', code("0")), (b'a', code("1"))]);
        assert!(matches!(bad, Err(HuffError::InvalidTable(_))));
        let bad = CodeTable::<u8>::from_codes([]);
        assert!(matches!(bad, Err(HuffError::InvalidTable(_))));
    }

    #[test]
    fn encoded_len_test() {
        let data = "aardvark".chars().collect::<Vec<_>>();
        let counts = crate::tools::freq_count::freqs(&data).unwrap();
        let table = CodeTable::build(&data, MergeStrategy::Sorted).unwrap();
        assert_eq!(table.encoded_len(&counts), Some(18));
    }

    #[test]
    fn deep_tree_test() {
        // Fibonacci weights make the deepest possible tree: one new level per symbol
        let mut fib = vec![1_u64, 1];
        while fib.len() < 20 {
            let n = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(n);
        }
        let counts = fib
            .iter()
            .enumerate()
            .map(|(i, &count)| SymbolCount {
                symbol: i as u16,
                count,
                first_seen: i,
            })
            .collect::<Vec<_>>();
        let tree = HuffmanTree::from_counts(&counts, MergeStrategy::Sorted).unwrap();
        let table = CodeTable::from_tree(&tree).unwrap();
        assert_eq!(table.max_len(), 19);
        assert!(table.is_prefix_free());
    }
}
