use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, warn, LevelFilter};

use crate::huffman_coding::tree::MergeStrategy;

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl From<Verbosity> for LevelFilter {
    fn from(verbose: Verbosity) -> Self {
        match verbose {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How the input bytes are split into symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// Every byte is a symbol
    Bytes,
    /// Every UTF-8 character is a symbol
    Text,
}

#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// Input alphabet
    pub alphabet: Alphabet,
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// How the tree builder picks the lightest nodes
    pub strategy: MergeStrategy,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            alphabet: Alphabet::Bytes,
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            op_mode: Mode::Zip,
            output: Output::File,
            strategy: MergeStrategy::Sorted,
            verbose: Verbosity::Warnings,
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    name = "huffpack",
    version,
    about = "Huffman coding compressor for bytes and text",
    long_about = None)]
pub struct Args {
    /// Files to process. Reads standard input when none are given.
    #[clap()]
    files: Vec<String>,

    /// Compress the input files (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Compress and decompress in memory, then report the compression metrics
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Keep (don't delete) input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Code UTF-8 characters instead of bytes
    #[clap(long = "text")]
    text: bool,

    /// Pick the lightest nodes with a binary heap instead of a sorted list
    #[clap(long = "heap")]
    heap: bool,

    /// Suppress all log output
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Be verbose (repeat for more: -vvv shows every tree merge)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u8,
}

impl From<Args> for HuffOpts {
    fn from(args: Args) -> Self {
        let mut opts = HuffOpts::new();
        opts.files = args.files;
        // decompress beats test beats compress
        if args.compress {
            opts.op_mode = Mode::Zip
        };
        if args.test {
            opts.op_mode = Mode::Test
        };
        if args.decompress {
            opts.op_mode = Mode::Unzip
        };
        opts.keep_input_files = args.keep;
        opts.force_overwrite = args.force;
        if args.stdout {
            opts.output = Output::Stdout;
            // Nothing to delete a file in favour of
            opts.keep_input_files = true;
        };
        if args.text {
            opts.alphabet = Alphabet::Text
        };
        if args.heap {
            opts.strategy = MergeStrategy::Heap
        };
        opts.verbose = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, 2) => Verbosity::Debug,
            (false, _) => Verbosity::Trace,
        };
        opts
    }
}

/// Parse the command line, set the log level, and report what we are about to do.
pub fn huffopts_init() -> HuffOpts {
    let opts = HuffOpts::from(Args::parse());

    // Set the log level
    log::set_max_level(opts.verbose.into());

    // Below we report initialization status to the user
    info!("---- huffpack Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    if opts.files.is_empty() {
        warn!("No files given, reading standard input");
    }
    opts.files
        .iter()
        .for_each(|s| info!("Getting input from the file {}", s));
    info!("Sending output to {}", opts.output);
    info!("Alphabet set to {:?}", opts.alphabet);
    info!("Merge strategy set to {:?}", opts.strategy);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    info!("---- huffpack Initialization End ----\n");
    opts
}
