use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{error, info};

use super::compress::{read_stdin, SUFFIX};
use super::container::{container_kind, read_container};
use crate::error::{HuffError, Result};
use crate::huffman_coding::symbol::Symbol;
use crate::tools::cli::{HuffOpts, Output};

/// Decompress the files specified in opts.
pub fn decompress(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let stored = read_stdin()?;
        io::stdout().write_all(&decompress_bytes(&stored)?)?;
        return Ok(());
    }

    // A failing file is logged and skipped, the first failure is returned at the end
    let mut first_error = None;
    for name in &opts.files {
        if let Err(e) = decompress_file(name, opts) {
            error!("{}: {}", name, e);
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn decompress_file(name: &str, opts: &HuffOpts) -> Result<()> {
    // Strip the suffix when there is one, otherwise add a new one
    let out_name = match name.strip_suffix(SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", name),
    };
    if opts.output == Output::File && Path::new(&out_name).exists() && !opts.force_overwrite {
        error!("Output file {} already exists, skipping.", out_name);
        return Ok(());
    }

    let stored = fs::read(name)?;
    let data = decompress_bytes(&stored)?;
    match opts.output {
        Output::File => fs::write(&out_name, &data)?,
        Output::Stdout => io::stdout().write_all(&data)?,
    }
    info!("{}: recovered {} bytes.", name, data.len());

    if !opts.keep_input_files {
        fs::remove_file(name)?;
    }
    Ok(())
}

/// Decode a stored container back to the bytes that were compressed.
pub fn decompress_bytes(stored: &[u8]) -> Result<Vec<u8>> {
    match container_kind(stored)? {
        kind if kind == u8::KIND => read_container::<u8, _>(stored)?.decode(),
        kind if kind == char::KIND => {
            let chars = read_container::<char, _>(stored)?.decode()?;
            Ok(chars.into_iter().collect::<String>().into_bytes())
        }
        kind if kind == u16::KIND => {
            let words = read_container::<u16, _>(stored)?.decode()?;
            Ok(words.iter().flat_map(|w| w.to_be_bytes()).collect())
        }
        kind => Err(HuffError::InvalidContainer(format!(
            "unknown symbol kind '{}'",
            kind as char
        ))),
    }
}
