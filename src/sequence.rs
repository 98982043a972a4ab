//! Reading symbol sequences from text.
//!
//! The format is deliberately simple: every non-whitespace character is one symbol, and lines
//! starting with `#` are comments. For example, the file
//!
//! ```text
//! # golden mean process
//! 0100101001
//! 0010100100
//! ```
//!
//! contains twenty symbols.

use crate::error::ReconstructionError;
use log::debug;
use std::path::Path;

/// Extract symbols from `text`, skipping whitespace and comment lines.
pub fn parse_symbols(text: &str) -> Vec<char> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.chars().filter(|it| !it.is_whitespace()))
        .collect()
}

/// Read and parse the symbols stored in the file at `path`.
pub fn read_symbols<P: AsRef<Path>>(path: P) -> Result<Vec<char>, ReconstructionError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ReconstructionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let symbols = parse_symbols(&text);
    debug!("Read {} symbols from `{}`.", symbols.len(), path.display());
    Ok(symbols)
}
