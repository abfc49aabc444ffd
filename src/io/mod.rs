//! I/O utilities.
//!
//! File reading with memory mapping for large inputs, plus Unicode helpers
//! for byte to character offset conversion and previews.

pub mod reader;
pub mod unicode;

pub use reader::{FileReader, read_file};
pub use unicode::{byte_to_char_offset, truncate_graphemes, validate_utf8};
