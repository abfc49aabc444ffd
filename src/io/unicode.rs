//! Unicode utilities for text processing.
//!
//! Chunk positions are character offsets while Rust strings are indexed by
//! bytes. These helpers map byte offsets to characters, validate raw input
//! and cut previews at grapheme cluster boundaries.

use unicode_segmentation::UnicodeSegmentation;

/// Converts a byte offset into a character offset.
///
/// `byte_offset` must lie on a character boundary; offsets past the end
/// return the total character count.
///
/// # Examples
///
/// ```
/// use semantic_engine::io::unicode::byte_to_char_offset;
///
/// let s = "Hello 世界";
/// assert_eq!(byte_to_char_offset(s, 6), 6);
/// assert_eq!(byte_to_char_offset(s, 9), 7);
/// ```
#[must_use]
pub fn byte_to_char_offset(s: &str, byte_offset: usize) -> usize {
    let end = byte_offset.min(s.len());
    s.get(..end).map_or_else(
        || s.char_indices().take_while(|(i, _)| *i < end).count(),
        |prefix| prefix.chars().count(),
    )
}

/// Validates that a byte slice is valid UTF-8.
///
/// # Errors
///
/// Returns the byte offset of the first invalid UTF-8 sequence.
pub fn validate_utf8(bytes: &[u8]) -> std::result::Result<&str, usize> {
    std::str::from_utf8(bytes).map_err(|e| e.valid_up_to())
}

/// Truncates a string at a grapheme cluster boundary.
///
/// # Examples
///
/// ```
/// use semantic_engine::io::unicode::truncate_graphemes;
///
/// assert_eq!(truncate_graphemes("Hello", 3), "Hel");
/// ```
#[must_use]
pub fn truncate_graphemes(s: &str, max_graphemes: usize) -> &str {
    let mut end_byte = 0;

    for (count, grapheme) in s.graphemes(true).enumerate() {
        if count >= max_graphemes {
            break;
        }
        end_byte += grapheme.len();
    }

    &s[..end_byte]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_char_offset() {
        let s = "Hello 世界!";
        assert_eq!(byte_to_char_offset(s, 0), 0);
        assert_eq!(byte_to_char_offset(s, 6), 6);
        assert_eq!(byte_to_char_offset(s, 12), 8);
        assert_eq!(byte_to_char_offset(s, 100), 9);
    }

    #[test]
    fn test_byte_to_char_offset_mid_char() {
        // Inside '世' counts only the characters that start before it.
        assert_eq!(byte_to_char_offset("a世", 2), 2);
    }

    #[test]
    fn test_validate_utf8() {
        assert!(validate_utf8(b"Hello").is_ok());
        assert!(validate_utf8("世界".as_bytes()).is_ok());
        assert_eq!(validate_utf8(&[b'a', 0xFF, 0xFE]), Err(1));
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("Hello", 3), "Hel");
        assert_eq!(truncate_graphemes("世界!", 2), "世界");
        assert_eq!(truncate_graphemes("Hello", 10), "Hello");
        assert_eq!(truncate_graphemes("e\u{301}x", 1), "e\u{301}");
    }
}
