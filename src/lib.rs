//! # semantic-engine
//!
//! Boundary-aware recursive text chunking.
//!
//! Documents are cut into chunks of at most `chunk_size` characters,
//! preferring markdown headings, then blank lines, line breaks and spaces,
//! and falling back to single characters only where nothing coarser fits.
//! Every chunk records its inclusive character span in the source, and the
//! chunks of a document always concatenate back to the original text.
//!
//! ## Features
//!
//! - **Recursive splitting**: separator priority with greedy packing
//! - **Batch splitting**: documents split in parallel with rayon
//! - **`SQLite` Storage**: documents and chunks written transactionally
//! - **Memory Mapping**: efficient reading of large files
//!
//! ## Example
//!
//! ```
//! use semantic_engine::split_text;
//!
//! let text = "## Intro\n\nShort intro.\n\n## Details\n\nMore words here.";
//! let chunks = split_text(text, 24).unwrap();
//! let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
//! assert_eq!(rebuilt, text);
//! assert!(chunks.iter().all(|c| c.len() <= 24));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod chunking;
pub mod cli;
pub mod core;
pub mod error;
pub mod io;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Chunk, CoverageReport, Doc, Origin, StoredChunk, verify_coverage};

// Re-export chunking types
pub use chunking::{
    DEFAULT_CHUNK_SIZE, ParallelSplitter, RecursiveSplitter, Separator, Splitter, split_text,
};

// Re-export storage types
pub use storage::{DEFAULT_DB_PATH, SqliteStorage, Storage};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
