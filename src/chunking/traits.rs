//! Splitter trait definition.
//!
//! Defines the interface for text splitters so ingestion code and the
//! parallel batch runner can work with any implementation.

use crate::core::Chunk;
use crate::error::{ChunkingError, Result};

/// Trait for splitting text into bounded-size chunks.
///
/// Implementations must be `Send + Sync` so batches can be split in
/// parallel, and must be deterministic: the same input always yields the
/// same chunks.
///
/// # Examples
///
/// ```
/// use semantic_engine::chunking::{RecursiveSplitter, Splitter};
///
/// let splitter = RecursiveSplitter::with_size(100);
/// let text = "Hello, world! ".repeat(20);
/// let chunks = splitter.split(&text).unwrap();
/// assert!(chunks.len() > 1);
/// ```
pub trait Splitter: Send + Sync {
    /// Splits `text` into chunks that tile it exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the splitter configuration is invalid.
    fn split(&self, text: &str) -> Result<Vec<Chunk>>;

    /// Returns the maximum chunk length in characters.
    fn chunk_size(&self) -> usize;

    /// Returns the name of the splitting strategy.
    fn name(&self) -> &'static str;

    /// Returns a description of the splitting strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Validates configuration before splitting.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::InvalidArgument`] if the chunk size is zero.
    fn validate(&self) -> Result<()> {
        if self.chunk_size() == 0 {
            return Err(ChunkingError::InvalidArgument {
                reason: "chunk_size must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
