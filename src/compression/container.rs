//! The `.huf` container: a code table followed by the bitstream it coded.
//!
//! Layout, MSB first:
//!
//! ```text
//! "HUF"            24 bits
//! version           8 bits
//! symbol kind       8 bits   b = u8, w = u16, c = char
//! table size       32 bits
//! table entries            symbol (kind width), code length (8 bits), code bits
//! symbol count     64 bits
//! stream length    64 bits   in bits
//! stream                     padded with zeros to a whole byte
//! ```

use std::io::{Read, Write};

use log::{debug, info};

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bits::Bitstream;
use crate::compression::decode::decode;
use crate::compression::encode::Compressed;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::huffman_coding::symbol::Symbol;

const MAGIC: [u8; 3] = *b"HUF";
const VERSION: u8 = 1;
/// Byte offset of the symbol kind tag.
const KIND_OFFSET: usize = 4;

/// A code table and bitstream read back from storage.
#[derive(Debug, Clone)]
pub struct Container<S: Symbol> {
    pub table: CodeTable<S>,
    /// Length of the original sequence.
    pub symbols: usize,
    pub stream: Bitstream,
}

impl<S: Symbol> Container<S> {
    /// Decode the stream and check it gave back as many symbols as were stored.
    pub fn decode(&self) -> Result<Vec<S>> {
        let data = decode(&self.table, &self.stream)?;
        if data.len() != self.symbols {
            return Err(HuffError::InvalidContainer(format!(
                "expected {} symbols, decoded {}",
                self.symbols,
                data.len()
            )));
        }
        Ok(data)
    }
}

impl<S: Symbol> From<Compressed<S>> for Container<S> {
    fn from(compressed: Compressed<S>) -> Self {
        Container {
            table: compressed.table,
            symbols: compressed.symbols,
            stream: compressed.stream,
        }
    }
}

/// Write `table`, the symbol count, and `stream` to `writer`. Returns the bytes written.
pub fn write_container<S: Symbol, W: Write>(
    writer: &mut W,
    table: &CodeTable<S>,
    symbols: usize,
    stream: &Bitstream,
) -> Result<usize> {
    let mut bp = BitPacker::new(16 + table.len() * 8 + stream.as_bytes().len());

    MAGIC.iter().for_each(|&x| bp.out8(x));
    bp.out8(VERSION);
    bp.out8(S::KIND);
    bp.out32(table.len() as u32);
    // Sorted so the same table always gives the same bytes
    for (symbol, code) in table.sorted() {
        bp.out_bits(symbol.to_bits() as u64, S::BITS);
        bp.out8(code.len());
        bp.out_bits(code.bits(), code.len());
    }
    debug!(
        "Code table written, stream starts at bit {} {}.",
        bp.bit_count(),
        bp.loc()
    );

    bp.out64(symbols as u64);
    bp.out64(stream.len() as u64);
    // Whole bytes first, then the tail a bit at a time
    let full = stream.len() / 8;
    stream.as_bytes()[..full].iter().for_each(|&x| bp.out8(x));
    stream.iter().skip(full * 8).for_each(|bit| bp.out_bit(bit));
    let bits = bp.bit_count();
    bp.flush();

    writer.write_all(&bp.output)?;
    info!(
        "Wrote {} bytes ({} bits, {} codes, {} stream bits).",
        bp.output.len(),
        bits,
        table.len(),
        stream.len()
    );
    Ok(bp.output.len())
}

/// Peek at the symbol kind tag of a stored container.
pub fn container_kind(data: &[u8]) -> Result<u8> {
    if data.len() <= KIND_OFFSET || data[..3] != MAGIC {
        return Err(HuffError::InvalidContainer(
            "not a huffpack container".to_string(),
        ));
    }
    if data[3] != VERSION {
        return Err(HuffError::InvalidContainer(format!(
            "unsupported version {}",
            data[3]
        )));
    }
    Ok(data[KIND_OFFSET])
}

/// Read a container whose symbols are of type `S`.
pub fn read_container<S: Symbol, R: Read>(reader: R) -> Result<Container<S>> {
    let mut br = BitReader::new(reader);

    let mut header = [0_u8; 5];
    for byte in header.iter_mut() {
        *byte = take_byte(&mut br, "header")?;
    }
    let kind = container_kind(&header)?;
    if kind != S::KIND {
        return Err(HuffError::InvalidContainer(format!(
            "holds symbols of kind '{}', expected '{}'",
            kind as char,
            S::KIND as char
        )));
    }

    let entries = take(&mut br, 32, "table size")? as usize;
    let mut pairs = Vec::with_capacity(entries.min(1 << 16));
    for _ in 0..entries {
        let raw = take(&mut br, S::BITS as usize, "symbol")? as u32;
        let symbol = S::from_bits(raw).ok_or_else(|| {
            HuffError::InvalidContainer(format!("{:#x} is not a valid symbol", raw))
        })?;
        let len = take(&mut br, 8, "code length")? as u8;
        if len == 0 || len > 64 {
            return Err(HuffError::InvalidContainer(format!(
                "code for {:?} has length {}",
                symbol, len
            )));
        }
        let bits = take(&mut br, len as usize, "code")?;
        let code = Code::new(bits, len).ok_or_else(|| {
            HuffError::InvalidContainer(format!("bad code for {:?}", symbol))
        })?;
        pairs.push((symbol, code));
    }
    let table = CodeTable::from_codes(pairs)?;
    debug!("Read {} codes at {}.", table.len(), br.loc());

    let symbols = take(&mut br, 64, "symbol count")? as usize;
    let bit_len = take(&mut br, 64, "stream length")? as usize;
    let mut bytes = Vec::with_capacity((bit_len / 8 + 1).min(1 << 24));
    for _ in 0..bit_len / 8 {
        bytes.push(take_byte(&mut br, "stream")?);
    }
    let rem = bit_len % 8;
    if rem > 0 {
        bytes.push((take(&mut br, rem, "stream")? as u8) << (8 - rem));
    }
    let stream = Bitstream::from_packed(bytes, bit_len)?;

    info!(
        "Read a container of {} codes and {} stream bits.",
        table.len(),
        stream.len()
    );
    Ok(Container {
        table,
        symbols,
        stream,
    })
}

/// Read n bits, treating a short read as a truncated container.
fn take<R: Read>(br: &mut BitReader<R>, n: usize, field: &str) -> Result<u64> {
    br.bint(n)?.ok_or_else(|| {
        HuffError::InvalidContainer(format!("truncated while reading the {}", field))
    })
}

fn take_byte<R: Read>(br: &mut BitReader<R>, field: &str) -> Result<u8> {
    br.byte()?.ok_or_else(|| {
        HuffError::InvalidContainer(format!("truncated while reading the {}", field))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::encode::compress;
    use crate::huffman_coding::tree::MergeStrategy;

    #[test]
    fn roundtrip_test() {
        let data = "aardvark".chars().collect::<Vec<_>>();
        let out = compress(&data, MergeStrategy::Sorted).unwrap();
        let mut stored = vec![];
        let written = write_container(&mut stored, &out.table, out.symbols, &out.stream).unwrap();
        assert_eq!(written, stored.len());
        assert_eq!(container_kind(&stored).unwrap(), b'c');

        let back = read_container::<char, _>(stored.as_slice()).unwrap();
        assert_eq!(back.table, out.table);
        assert_eq!(back.stream, out.stream);
        assert_eq!(back.decode().unwrap(), data);
    }

    #[test]
    fn wrong_kind_test() {
        let out = compress(b"hello", MergeStrategy::Sorted).unwrap();
        let mut stored = vec![];
        write_container(&mut stored, &out.table, out.symbols, &out.stream).unwrap();
        assert!(matches!(
            read_container::<char, _>(stored.as_slice()),
            Err(HuffError::InvalidContainer(_))
        ));
        assert!(read_container::<u8, _>(stored.as_slice()).is_ok());
    }

    #[test]
    fn bad_magic_test() {
        let out = compress(b"hello", MergeStrategy::Sorted).unwrap();
        let mut stored = vec![];
        write_container(&mut stored, &out.table, out.symbols, &out.stream).unwrap();
        stored[0] = b'X';
        assert!(matches!(
            read_container::<u8, _>(stored.as_slice()),
            Err(HuffError::InvalidContainer(_))
        ));
    }

    #[test]
    fn truncated_test() {
        let out = compress(b"hello world", MergeStrategy::Sorted).unwrap();
        let mut stored = vec![];
        write_container(&mut stored, &out.table, out.symbols, &out.stream).unwrap();
        stored.truncate(stored.len() - 1);
        assert!(matches!(
            read_container::<u8, _>(stored.as_slice()),
            Err(HuffError::InvalidContainer(_))
        ));
    }

    #[test]
    fn symbol_count_mismatch_test() {
        // A single symbol code of "0" can't tell "aaaa" from "aaa" on its own
        let out = compress(b"aaaa", MergeStrategy::Sorted).unwrap();
        let mut stream = out.stream.clone();
        stream.truncate(3);
        let container = Container {
            table: out.table,
            symbols: out.symbols,
            stream,
        };
        assert!(matches!(
            container.decode(),
            Err(HuffError::InvalidContainer(_))
        ));
    }

    #[test]
    fn written_size_test() {
        // 72 header bits, 5 entries of 21 + 8 bits plus 14 code bits, 128 count bits,
        // then 18 stream bits: 377 bits in 48 bytes
        let data = "aardvark".chars().collect::<Vec<_>>();
        let out = compress(&data, MergeStrategy::Sorted).unwrap();
        let mut stored = vec![];
        let size = write_container(&mut stored, &out.table, out.symbols, &out.stream).unwrap();
        assert_eq!(size, 48);
        assert_eq!(stored.len(), 48);
        // The last stream bit sits alone in the final byte
        assert_eq!(stored[47] & 0b0111_1111, 0);
        let back = read_container::<char, _>(stored.as_slice()).unwrap();
        assert_eq!(back.stream, out.stream);
    }
}
