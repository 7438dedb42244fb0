//! The tools module provides helper functions for huffpack.
//!
//! The tools are:
//! - cli: Command line interface and run options.
//! - freq_count: Frequency count of the input symbols, the first step of building a code.
//!
pub mod cli;
pub mod freq_count;
