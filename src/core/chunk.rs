//! Chunk representation.
//!
//! A chunk is a contiguous slice of a source document produced by the
//! splitter. Positions are 0-based character offsets into the source, with
//! an inclusive end, so a chunk always satisfies
//! `end_position - start_position + 1 == content.chars().count()`.

use serde::{Deserialize, Serialize};

use crate::io::unicode::truncate_graphemes;

/// A bounded-size segment of a source text.
///
/// # Examples
///
/// ```
/// use semantic_engine::core::Chunk;
///
/// let chunk = Chunk::new(10, "Hello".to_string());
/// assert_eq!(chunk.start_position, 10);
/// assert_eq!(chunk.end_position, 14);
/// assert_eq!(chunk.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Character offset of the first character.
    pub start_position: usize,

    /// Character offset of the last character (inclusive).
    pub end_position: usize,

    /// Exact source text spanning `[start_position, end_position]`.
    pub content: String,
}

impl Chunk {
    /// Creates a chunk starting at `start_position`, deriving the end
    /// position from the content length.
    ///
    /// `content` must be non-empty; the splitter never produces empty chunks.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `content` is empty, since no inclusive span
    /// can describe zero characters.
    #[must_use]
    pub fn new(start_position: usize, content: String) -> Self {
        debug_assert!(!content.is_empty(), "chunk content must be non-empty");
        let len = content.chars().count();
        Self {
            start_position,
            end_position: (start_position + len).saturating_sub(1),
            content,
        }
    }

    /// Returns the chunk length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// Checks if the chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns a preview of the content, cut at a grapheme boundary.
    #[must_use]
    pub fn preview(&self, max_graphemes: usize) -> &str {
        truncate_graphemes(&self.content, max_graphemes)
    }
}

/// A chunk as persisted, tied to its parent document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredChunk {
    /// Row identifier assigned by storage.
    pub id: i64,

    /// ID of the parent document.
    pub doc_id: String,

    /// The chunk itself.
    #[serde(flatten)]
    pub chunk: Chunk,
}

/// Outcome of checking a chunk sequence against its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Number of chunks examined.
    pub chunk_count: usize,
    /// Length of the source in characters.
    pub source_len: usize,
    /// Problems found, empty when the chunks reproduce the source exactly.
    pub problems: Vec<String>,
}

impl CoverageReport {
    /// Returns `true` when no problems were found.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Checks that `chunks` tile `source` exactly: non-empty, contiguous from
/// position 0 to the last character, lengths consistent with positions, and
/// concatenating to the source.
#[must_use]
pub fn verify_coverage(source: &str, chunks: &[Chunk]) -> CoverageReport {
    let source_len = source.chars().count();
    let mut problems = Vec::new();
    let mut expected_start = 0;

    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.is_empty() {
            problems.push(format!("chunk {i} is empty"));
            continue;
        }
        if chunk.start_position != expected_start {
            problems.push(format!(
                "chunk {i} starts at {} but {expected_start} was expected",
                chunk.start_position
            ));
        }
        if chunk.end_position + 1 != chunk.start_position + chunk.len() {
            problems.push(format!(
                "chunk {i} spans {}..={} but holds {} characters",
                chunk.start_position,
                chunk.end_position,
                chunk.len()
            ));
        }
        expected_start = chunk.end_position + 1;
    }

    if !chunks.is_empty() && expected_start != source_len {
        problems.push(format!(
            "chunks end at {} but source has {source_len} characters",
            expected_start.saturating_sub(1)
        ));
    }

    let reassembled: String = chunks.iter().map(|c| c.content.as_str()).collect();
    if reassembled != source {
        problems.push("reassembled content differs from source".to_string());
    }

    CoverageReport {
        chunk_count: chunks.len(),
        source_len,
        problems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_new_derives_end() {
        let chunk = Chunk::new(0, "abcdefghij".to_string());
        assert_eq!(chunk.start_position, 0);
        assert_eq!(chunk.end_position, 9);
        assert_eq!(chunk.len(), 10);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_chunk_positions_count_chars_not_bytes() {
        let chunk = Chunk::new(3, "héllo 世界".to_string());
        assert_eq!(chunk.len(), 8);
        assert_eq!(chunk.end_position, 10);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "chunk content must be non-empty")]
    fn test_chunk_new_rejects_empty_content() {
        let _ = Chunk::new(5, String::new());
    }

    #[test]
    fn test_single_char_chunk_starts_and_ends_together() {
        let chunk = Chunk::new(5, "x".to_string());
        assert_eq!(chunk.start_position, 5);
        assert_eq!(chunk.end_position, 5);
    }

    #[test]
    fn test_chunk_preview() {
        let chunk = Chunk::new(0, "Hello, world!".to_string());
        assert_eq!(chunk.preview(5), "Hello");
        assert_eq!(chunk.preview(100), "Hello, world!");
    }

    #[test]
    fn test_chunk_serializes_camel_case() {
        let chunk = Chunk::new(20, "uvwxyz".to_string());
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["startPosition"], 20);
        assert_eq!(json["endPosition"], 25);
        assert_eq!(json["content"], "uvwxyz");
    }

    #[test]
    fn test_stored_chunk_flattens() {
        let stored = StoredChunk {
            id: 7,
            doc_id: "doc".to_string(),
            chunk: Chunk::new(0, "a".to_string()),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["docId"], "doc");
        assert_eq!(json["startPosition"], 0);
    }

    #[test]
    fn test_verify_coverage_valid() {
        let source = "abcdef";
        let chunks = vec![
            Chunk::new(0, "abc".to_string()),
            Chunk::new(3, "def".to_string()),
        ];
        let report = verify_coverage(source, &chunks);
        assert!(report.is_valid(), "{:?}", report.problems);
        assert_eq!(report.chunk_count, 2);
        assert_eq!(report.source_len, 6);
    }

    #[test]
    fn test_verify_coverage_empty_source() {
        let report = verify_coverage("", &[]);
        assert!(report.is_valid());
    }

    #[test]
    fn test_verify_coverage_gap() {
        let source = "abcdef";
        let chunks = vec![
            Chunk::new(0, "ab".to_string()),
            Chunk::new(3, "def".to_string()),
        ];
        let report = verify_coverage(source, &chunks);
        assert!(!report.is_valid());
        assert!(report.problems.iter().any(|p| p.contains("chunk 1 starts at 3")));
    }

    #[test]
    fn test_verify_coverage_truncated() {
        let source = "abcdef";
        let chunks = vec![Chunk::new(0, "abc".to_string())];
        let report = verify_coverage(source, &chunks);
        assert!(!report.is_valid());
        assert_eq!(report.problems.len(), 2);
    }

    #[test]
    fn test_verify_coverage_bad_end_position() {
        let mut chunk = Chunk::new(0, "abc".to_string());
        chunk.end_position = 5;
        let report = verify_coverage("abc", &[chunk]);
        assert!(!report.is_valid());
        assert!(report.problems.iter().any(|p| p.contains("holds 3 characters")));
    }
}
