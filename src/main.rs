//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use huffpack::compression::compress::{compress, test};
use huffpack::compression::decompress::decompress;
use huffpack::tools::cli::{huffopts_init, Mode};
use huffpack::HuffError;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), HuffError> {
    // Available log levels are Error, Warn, Info, Debug, Trace. The cli narrows this down.
    // Logs go to stderr so they never mix with data sent to stdout.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Unable to start the logger: {}", e);
    }

    let options = huffopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress(&options),
        Mode::Unzip => decompress(&options),
        Mode::Test => test(&options),
    };

    match &result {
        Ok(()) => info!("Done.\n"),
        Err(e) => error!("{}", e),
    }
    result
}
