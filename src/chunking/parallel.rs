//! Parallel batch splitting.
//!
//! Splitting is pure, so independent documents can be split on separate
//! threads with rayon. Results come back in input order.

use crate::chunking::traits::Splitter;
use crate::core::Chunk;
use crate::error::Result;
use rayon::prelude::*;
use tracing::debug;

/// Splits batches of documents in parallel with an inner splitter.
///
/// # Examples
///
/// ```
/// use semantic_engine::chunking::{ParallelSplitter, RecursiveSplitter};
///
/// let batch = ParallelSplitter::new(RecursiveSplitter::with_size(20));
/// let docs = vec![("a", "first document body"), ("b", "second, somewhat longer, document body")];
/// let results = batch.split_all(&docs).unwrap();
/// assert_eq!(results[0].0, "a");
/// assert_eq!(results[1].1.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ParallelSplitter<S: Splitter> {
    inner: S,
    /// Batches smaller than this are split sequentially.
    min_parallel_batch: usize,
}

impl<S: Splitter> ParallelSplitter<S> {
    /// Wraps `inner` for batch use.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            min_parallel_batch: 2,
        }
    }

    /// Sets the minimum batch size for parallel processing.
    #[must_use]
    pub const fn min_parallel_batch(mut self, size: usize) -> Self {
        self.min_parallel_batch = size;
        self
    }

    /// Returns the wrapped splitter.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Splits every `(id, text)` pair, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns the first splitting error; no partial results are returned.
    pub fn split_all<I, T>(&self, docs: &[(I, T)]) -> Result<Vec<(I, Vec<Chunk>)>>
    where
        I: Clone + Send + Sync,
        T: AsRef<str> + Sync,
    {
        self.inner.validate()?;

        let split_one = |(id, text): &(I, T)| -> Result<(I, Vec<Chunk>)> {
            Ok((id.clone(), self.inner.split(text.as_ref())?))
        };

        if docs.len() < self.min_parallel_batch {
            return docs.iter().map(split_one).collect();
        }

        debug!(
            docs = docs.len(),
            threads = rayon::current_num_threads(),
            "splitting batch in parallel"
        );
        docs.par_iter().map(split_one).collect()
    }
}
