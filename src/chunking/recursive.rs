//! Boundary-aware recursive splitter.
//!
//! Cuts a text at the most structural separator it contains, greedily packs
//! the pieces back into chunks of at most `chunk_size` characters, and
//! recurses with the next separator into any piece that is still too long.

use std::ops::Range;

use tracing::{debug, trace};

use crate::chunking::DEFAULT_CHUNK_SIZE;
use crate::chunking::separator::resolve;
use crate::chunking::traits::Splitter;
use crate::core::Chunk;
use crate::error::Result;

/// Recursive splitter preferring headings, then paragraphs, lines, words
/// and finally single characters.
///
/// Chunk lengths and positions are measured in characters. The output
/// always tiles the input: chunks are contiguous, non-empty, start at 0 and
/// concatenate back to the original text.
///
/// # Examples
///
/// ```
/// use semantic_engine::chunking::{RecursiveSplitter, Splitter};
///
/// let splitter = RecursiveSplitter::with_size(10);
/// let chunks = splitter.split("abcdefghijklmnopqrstuvwxyz").unwrap();
/// assert_eq!(chunks.len(), 3);
/// assert_eq!(chunks[2].content, "uvwxyz");
/// assert_eq!(chunks[2].start_position, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursiveSplitter {
    chunk_size: usize,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveSplitter {
    /// Creates a splitter with the default chunk size.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Creates a splitter with a custom chunk size.
    ///
    /// A size of zero is accepted here and rejected by [`Splitter::split`].
    #[must_use]
    pub const fn with_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Splits `span`, located at character `offset` of the source, using
    /// separators from `cursor` onwards.
    fn split_span(&self, span: &str, offset: usize, cursor: usize, out: &mut Vec<Chunk>) {
        let span_len = span.chars().count();
        if span_len <= self.chunk_size {
            if span_len > 0 {
                out.push(Chunk::new(offset, span.to_string()));
            }
            return;
        }

        let (separator, next_cursor) = resolve(span, cursor);
        trace!(?separator, offset, span_len, "splitting span");

        let mut pending = Pending::new(span);
        let mut position = offset;

        for (byte_offset, piece) in separator.pieces(span) {
            let piece_len = piece.chars().count();

            if piece_len > self.chunk_size {
                pending.flush(out);
                self.split_span(piece, position, next_cursor, out);
            } else {
                if pending.len + piece_len > self.chunk_size {
                    pending.flush(out);
                }
                pending.push(byte_offset..byte_offset + piece.len(), position, piece_len);
            }

            position += piece_len;
        }

        pending.flush(out);
    }
}

impl Splitter for RecursiveSplitter {
    fn split(&self, text: &str) -> Result<Vec<Chunk>> {
        self.validate()?;

        if text.is_empty() {
            return Ok(vec![]);
        }

        let mut chunks = Vec::new();
        self.split_span(text, 0, 0, &mut chunks);

        debug!(
            chunk_size = self.chunk_size,
            text_bytes = text.len(),
            chunks = chunks.len(),
            "split text"
        );
        Ok(chunks)
    }

    fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn name(&self) -> &'static str {
        "recursive"
    }

    fn description(&self) -> &'static str {
        "Recursive splitting on markdown headings, paragraphs, lines, words, then characters"
    }
}

/// Run of adjacent pieces waiting to be emitted as one chunk.
struct Pending<'a> {
    span: &'a str,
    bytes: Range<usize>,
    start_position: usize,
    len: usize,
}

impl<'a> Pending<'a> {
    const fn new(span: &'a str) -> Self {
        Self {
            span,
            bytes: 0..0,
            start_position: 0,
            len: 0,
        }
    }

    /// Appends a piece; pieces arrive contiguous and in order.
    fn push(&mut self, bytes: Range<usize>, position: usize, len: usize) {
        if self.len == 0 {
            self.bytes = bytes;
            self.start_position = position;
        } else {
            self.bytes.end = bytes.end;
        }
        self.len += len;
    }

    fn flush(&mut self, out: &mut Vec<Chunk>) {
        if self.len > 0 {
            let content = self.span[self.bytes.clone()].to_string();
            out.push(Chunk {
                start_position: self.start_position,
                end_position: self.start_position + self.len - 1,
                content,
            });
            self.len = 0;
        }
    }
}
