use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::{HuffError, Result};
use crate::huffman_coding::symbol::Symbol;

/// Inputs longer than this are counted in parallel.
const PARALLEL_THRESHOLD: usize = 64_000;
/// 16k is pretty much the sweet spot for chunk size.
const CHUNK_SIZE: usize = 16_000;

/// How often a symbol occurs, and where it was first seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolCount<S> {
    pub symbol: S,
    pub count: u64,
    pub first_seen: usize,
}

/// Returns a frequency count of the input data, one entry per distinct symbol in order of
/// first appearance. Uses parallelism when the data set is over 64k.
pub fn freqs<S: Symbol>(data: &[S]) -> Result<Vec<SymbolCount<S>>> {
    count_symbols(data, data.len() > PARALLEL_THRESHOLD)
}

pub(crate) fn count_symbols<S: Symbol>(data: &[S], parallel: bool) -> Result<Vec<SymbolCount<S>>> {
    if data.is_empty() {
        return Err(HuffError::EmptyInput);
    }

    let tally = if parallel {
        data.par_chunks(CHUNK_SIZE)
            .enumerate()
            .fold(FxHashMap::default, |mut tally, (i, chunk)| {
                count_chunk(&mut tally, i * CHUNK_SIZE, chunk);
                tally
            })
            .reduce(FxHashMap::default, merge_tallies)
    } else {
        let mut tally = FxHashMap::default();
        count_chunk(&mut tally, 0, data);
        tally
    };

    let mut counts = tally
        .into_iter()
        .map(|(symbol, (count, first_seen))| SymbolCount {
            symbol,
            count,
            first_seen,
        })
        .collect::<Vec<_>>();
    counts.sort_unstable_by_key(|c| c.first_seen);
    Ok(counts)
}

/// Tally one chunk. `offset` is the position of the chunk's first symbol in the whole input.
fn count_chunk<S: Symbol>(tally: &mut FxHashMap<S, (u64, usize)>, offset: usize, chunk: &[S]) {
    for (i, &symbol) in chunk.iter().enumerate() {
        tally.entry(symbol).or_insert((0, offset + i)).0 += 1;
    }
}

/// Sum two tallies, keeping the earliest first position of each symbol.
fn merge_tallies<S: Symbol>(
    mut into: FxHashMap<S, (u64, usize)>,
    from: FxHashMap<S, (u64, usize)>,
) -> FxHashMap<S, (u64, usize)> {
    for (symbol, (count, first_seen)) in from {
        let entry = into.entry(symbol).or_insert((0, first_seen));
        entry.0 += count;
        entry.1 = entry.1.min(first_seen);
    }
    into
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn aardvark_test() {
        let data = "aardvark".chars().collect::<Vec<_>>();
        let counts = freqs(&data).unwrap();
        let summary = counts
            .iter()
            .map(|c| (c.symbol, c.count))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![('a', 3), ('r', 2), ('d', 1), ('v', 1), ('k', 1)]
        );
    }

    #[test]
    fn empty_test() {
        let data: [u8; 0] = [];
        assert!(matches!(freqs(&data), Err(HuffError::EmptyInput)));
    }

    #[test]
    fn parallel_matches_sequential_test() {
        // Enough data to span many chunks, with some symbols first appearing late
        let data = (0..100_000_u32)
            .map(|i| ((i * 7919) % 251 + i / 40_000) as u8)
            .collect::<Vec<u8>>();
        let sequential = count_symbols(&data, false).unwrap();
        let parallel = count_symbols(&data, true).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(
            sequential.iter().map(|c| c.count).sum::<u64>(),
            data.len() as u64
        );
    }
}
