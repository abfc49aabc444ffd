//! Text splitting.
//!
//! The [`RecursiveSplitter`] cuts documents into chunks of bounded
//! character length, preferring markdown headings, then paragraphs, lines
//! and words, and falling back to single characters only where needed.
//! [`ParallelSplitter`] runs any [`Splitter`] over a batch of documents.

pub mod parallel;
pub mod recursive;
pub mod separator;
pub mod traits;

pub use parallel::ParallelSplitter;
pub use recursive::RecursiveSplitter;
pub use separator::{PRIORITY, Separator, resolve};
pub use traits::Splitter;

use crate::core::Chunk;
use crate::error::Result;

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Splits `text` into chunks of at most `chunk_size` characters.
///
/// The chunks tile the text: they are contiguous, non-empty and
/// concatenate back to `text`. Empty text yields no chunks.
///
/// # Errors
///
/// Returns [`crate::error::ChunkingError::InvalidArgument`] if `chunk_size`
/// is zero.
///
/// # Examples
///
/// ```
/// use semantic_engine::chunking::split_text;
///
/// let chunks = split_text(&"x".repeat(500), 100).unwrap();
/// assert_eq!(chunks.len(), 5);
/// assert_eq!(chunks[4].start_position, 400);
/// assert!(split_text("text", 0).is_err());
/// ```
pub fn split_text(text: &str, chunk_size: usize) -> Result<Vec<Chunk>> {
    RecursiveSplitter::with_size(chunk_size).split(text)
}
