use log::info;

use crate::bitstream::bits::Bitstream;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::huffman_coding::symbol::Symbol;

/*
    The decoder has one state: it appends each bit to a candidate and looks the candidate up
    in the reverse index. A hit emits the symbol and empties the candidate. Because no code
    is a prefix of another, the first hit is the only possible one.

    A candidate longer than the longest code can never match, so we stop right there rather
    than scanning the rest of the stream.
*/

/// Recover the symbol sequence from a bitstream coded with `table`.
///
/// A bare stream cut exactly on a code boundary still decodes, to a shorter sequence. Use
/// [`Container::decode`](crate::compression::container::Container::decode) when the symbol
/// count has to be checked as well.
pub fn decode<S: Symbol>(table: &CodeTable<S>, stream: &Bitstream) -> Result<Vec<S>> {
    let index = table.reverse_index();
    let max_len = table.max_len();
    let mut output = Vec::with_capacity(stream.len() / max_len.max(1) as usize);

    let mut bits = 0_u64;
    let mut len = 0_u8;
    for (offset, bit) in stream.iter().enumerate() {
        if len == max_len {
            return Err(HuffError::MalformedStream {
                offset: offset - len as usize,
                pending: len as usize + 1,
            });
        }
        bits = bits << 1 | bit as u64;
        len += 1;
        if let Some(&symbol) = index.get(&Code::raw(bits, len)) {
            output.push(symbol);
            bits = 0;
            len = 0;
        }
    }

    if len > 0 {
        return Err(HuffError::MalformedStream {
            offset: stream.len() - len as usize,
            pending: len as usize,
        });
    }
    info!("Decoding complete. Recovered {} symbols.", output.len());
    Ok(output)
}
