//! File-backed adapters for reading and patching target files.
//!
//! - `locator` reads values and searches lines ([`FileLocator`]).
//! - `batch` rewrites files for a batch of modification tasks
//!   ([`BatchApplier`]).
//!
//! Both split files into raw byte lines without the line terminator; a
//! trailing `\r` is dropped as well, so CRLF files read the same as LF files.
//! No encoding is assumed, and bytes outside a rewritten value are written
//! back as they were read.  Every path goes through
//! [`sanitize_path`](linepatch_core::sanitize_path) before it reaches the file
//! system.

pub mod batch;
pub mod locator;

pub use batch::BatchApplier;
pub use locator::FileLocator;

use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads every line of `path` as bytes.  The file handle is closed before
/// returning.
fn read_lines(path: &Path) -> std::io::Result<Vec<Vec<u8>>> {
    let file = std::fs::File::open(path)?;
    BufReader::new(file)
        .split(b'\n')
        .map(|line| {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(line)
        })
        .collect()
}
