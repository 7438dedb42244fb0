use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use log::{error, info, warn};

use super::container::write_container;
use super::decompress::decompress_bytes;
use super::encode::{compress as compress_symbols, CompressionMetrics};
use crate::error::{HuffError, Result};
use crate::tools::cli::{Alphabet, HuffOpts, Output};

/// Suffix added to compressed files.
pub const SUFFIX: &str = ".huf";

/*
    Each input is read whole, coded with a table built from its own symbol counts, and
    written out as a container holding that table and the bitstream. There is no block
    structure: the full sequence has to be known before the code can be built.
*/

/// Compress the input files defined in opts.
pub fn compress(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let data = read_stdin()?;
        let (stored, metrics) = compress_bytes(&data, opts)?;
        io::stdout().write_all(&stored)?;
        info!("stdin: {}", metrics);
        return Ok(());
    }

    // A failing file is logged and skipped, the first failure is returned at the end
    let mut first_error = None;
    for name in &opts.files {
        if let Err(e) = compress_file(name, opts) {
            error!("{}: {}", name, e);
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn compress_file(name: &str, opts: &HuffOpts) -> Result<()> {
    let out_name = format!("{}{}", name, SUFFIX);
    if name.ends_with(SUFFIX) {
        warn!("{} already has the {} suffix, skipping.", name, SUFFIX);
        return Ok(());
    }
    if opts.output == Output::File && Path::new(&out_name).exists() && !opts.force_overwrite {
        error!("Output file {} already exists, skipping.", out_name);
        return Ok(());
    }

    let data = fs::read(name)?;
    let (stored, metrics) = compress_bytes(&data, opts)?;
    match opts.output {
        Output::File => fs::write(&out_name, &stored)?,
        Output::Stdout => io::stdout().write_all(&stored)?,
    }
    info!("{}: {}", name, metrics);

    if !opts.keep_input_files {
        fs::remove_file(name)?;
    }
    Ok(())
}

/// Compress and decompress each input in memory, check the round trip, and report the metrics.
pub fn test(opts: &HuffOpts) -> Result<()> {
    let inputs = if opts.files.is_empty() {
        vec![("stdin".to_string(), read_stdin()?)]
    } else {
        opts.files
            .iter()
            .map(|name| -> Result<(String, Vec<u8>)> { Ok((name.clone(), fs::read(name)?)) })
            .collect::<Result<Vec<_>>>()?
    };

    for (name, data) in inputs {
        let (stored, metrics) = compress_bytes(&data, opts)?;
        let recovered = decompress_bytes(&stored)?;
        if recovered != data {
            error!("{}: round trip does not match the input.", name);
            return Err(HuffError::InvalidContainer(format!(
                "{} did not survive the round trip",
                name
            )));
        }
        println!("{}: ok", name);
        println!("  No. of bits before compression: {}", metrics.bits_before);
        println!("  No. of bits after compression:  {}", metrics.bits_after);
        println!("  Compression ratio: {:.4}", metrics.ratio);
        println!("  Container size: {} bytes (input {} bytes)", stored.len(), data.len());
    }
    Ok(())
}

/// Code `data` as bytes or UTF-8 text and return the stored container.
pub fn compress_bytes(data: &[u8], opts: &HuffOpts) -> Result<(Vec<u8>, CompressionMetrics)> {
    let mut stored = Vec::with_capacity(data.len() / 2 + 64);
    let metrics = match opts.alphabet {
        Alphabet::Bytes => {
            let out = compress_symbols(data, opts.strategy)?;
            write_container(&mut stored, &out.table, out.symbols, &out.stream)?;
            out.metrics
        }
        Alphabet::Text => {
            let text = std::str::from_utf8(data)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let chars = text.chars().collect::<Vec<_>>();
            let out = compress_symbols(&chars, opts.strategy)?;
            write_container(&mut stored, &out.table, out.symbols, &out.stream)?;
            out.metrics
        }
    };
    Ok((stored, metrics))
}

pub(crate) fn read_stdin() -> Result<Vec<u8>> {
    let mut data = vec![];
    io::stdin().read_to_end(&mut data)?;
    Ok(data)
}
