//! The huffman_coding module builds the prefix code: the tree from symbol counts, and the code
//! table from the tree.
//!
//! Construction is greedy. The two lightest nodes of the active set are joined under a new
//! internal node until a single root is left, and the lighter of the two becomes the left
//! child. Ties are always broken the same way, so a given input gives the same table on
//! every run.
//!
//! Building the tree and reading codes off it are inherently sequential and do not benefit
//! from multithreading. Only the frequency count that feeds them runs in parallel.
//!

pub mod code_table;
pub mod symbol;
pub mod tree;
