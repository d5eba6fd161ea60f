//! Text rules: where a value sits inside a line, and how a path string is
//! cleaned before it reaches the file system.

pub mod locate;
pub mod path;
