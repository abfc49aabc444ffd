//! Separator priority table and resolution.
//!
//! Separators are tried from the most structural (markdown headings) to the
//! least (single characters). A split level uses exactly one separator: the
//! first entry of the table, at or after the cursor, that occurs in the span.

/// A breakpoint kind the splitter may cut before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `"\n## "`
    Heading2,
    /// `"\n### "`
    Heading3,
    /// `"\n#### "`
    Heading4,
    /// `"\n##### "`
    Heading5,
    /// `"\n###### "`
    Heading6,
    /// `"\n\n"`
    Paragraph,
    /// `"\n"`
    Line,
    /// `" "`
    Word,
    /// Every character boundary. Always available.
    Character,
}

/// All separators, highest priority first.
pub const PRIORITY: [Separator; 9] = [
    Separator::Heading2,
    Separator::Heading3,
    Separator::Heading4,
    Separator::Heading5,
    Separator::Heading6,
    Separator::Paragraph,
    Separator::Line,
    Separator::Word,
    Separator::Character,
];

impl Separator {
    /// Returns the literal text of the separator (empty for `Character`).
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Heading2 => "\n## ",
            Self::Heading3 => "\n### ",
            Self::Heading4 => "\n#### ",
            Self::Heading5 => "\n##### ",
            Self::Heading6 => "\n###### ",
            Self::Paragraph => "\n\n",
            Self::Line => "\n",
            Self::Word => " ",
            Self::Character => "",
        }
    }

    /// Checks whether the separator occurs anywhere in `span`.
    #[must_use]
    pub fn occurs_in(self, span: &str) -> bool {
        match self {
            Self::Character => true,
            _ => span.contains(self.pattern()),
        }
    }

    /// Cuts `span` immediately before every position where the separator
    /// begins, returning `(byte_offset, piece)` pairs in order.
    ///
    /// The separator text stays at the front of the piece that follows it,
    /// so concatenating the pieces gives back `span`. Overlapping
    /// occurrences each start a piece (`"a\n\n\nb"` split on paragraphs
    /// gives `"a"`, `"\n"`, `"\n\nb"`), and no piece is empty.
    #[must_use]
    pub fn pieces(self, span: &str) -> Vec<(usize, &str)> {
        if self == Self::Character {
            return span
                .char_indices()
                .map(|(i, c)| (i, &span[i..i + c.len_utf8()]))
                .collect();
        }

        let pattern = self.pattern();
        let step = pattern.chars().next().map_or(1, char::len_utf8);
        let mut pieces = Vec::new();
        let mut piece_start = 0;
        let mut search_from = 0;

        while let Some(found) = span[search_from..].find(pattern) {
            let at = search_from + found;
            if at > piece_start {
                pieces.push((piece_start, &span[piece_start..at]));
                piece_start = at;
            }
            search_from = at + step;
        }

        if piece_start < span.len() {
            pieces.push((piece_start, &span[piece_start..]));
        }

        pieces
    }
}

/// Picks the separator for a span.
///
/// Returns the first separator in `PRIORITY[cursor..]` occurring in `span`,
/// together with the cursor to use when a resulting piece needs further
/// splitting. A cursor past the end of the table resolves to `Character`.
///
/// # Examples
///
/// ```
/// use semantic_engine::chunking::separator::{Separator, resolve};
///
/// let (sep, next) = resolve("one\n\ntwo three", 0);
/// assert_eq!(sep, Separator::Paragraph);
/// assert_eq!(next, 6);
/// ```
#[must_use]
pub fn resolve(span: &str, cursor: usize) -> (Separator, usize) {
    PRIORITY
        .iter()
        .enumerate()
        .skip(cursor)
        .find(|(_, separator)| separator.occurs_in(span))
        .map_or((Separator::Character, PRIORITY.len()), |(i, separator)| {
            (*separator, i + 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ends_with_character() {
        assert_eq!(PRIORITY.last(), Some(&Separator::Character));
        assert_eq!(PRIORITY[0].pattern(), "\n## ");
    }

    #[test]
    fn test_resolve_prefers_heading() {
        let text = "# Title\n\n## Section\n\nBody text";
        assert_eq!(resolve(text, 0), (Separator::Heading2, 1));
    }

    #[test]
    fn test_resolve_respects_cursor() {
        let text = "# Title\n\n## Section\n\nBody text";
        assert_eq!(resolve(text, 1), (Separator::Paragraph, 6));
        assert_eq!(resolve(text, 6), (Separator::Line, 7));
        assert_eq!(resolve(text, 7), (Separator::Word, 8));
        assert_eq!(resolve(text, 8), (Separator::Character, 9));
    }

    #[test]
    fn test_resolve_past_end_is_character() {
        assert_eq!(resolve("abc", 9), (Separator::Character, 9));
        assert_eq!(resolve("abc", 42), (Separator::Character, 9));
    }

    #[test]
    fn test_resolve_no_separator() {
        assert_eq!(resolve("abcdefghij", 0), (Separator::Character, 9));
    }

    #[test]
    fn test_heading_needs_leading_newline() {
        // A heading on the first line has no preceding "\n".
        assert_eq!(resolve("## Only heading", 0).0, Separator::Word);
    }

    #[test]
    fn test_pieces_split_before_separator() {
        let pieces: Vec<&str> = Separator::Paragraph
            .pieces("a\n\nb\n\nc")
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(pieces, vec!["a", "\n\nb", "\n\nc"]);
    }

    #[test]
    fn test_pieces_leading_separator_not_empty() {
        let pieces = Separator::Word.pieces(" leading space");
        assert_eq!(pieces, vec![(0, " leading"), (8, " space")]);
    }

    #[test]
    fn test_pieces_overlapping_occurrences() {
        let pieces: Vec<&str> = Separator::Paragraph
            .pieces("a\n\n\nb")
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(pieces, vec!["a", "\n", "\n\nb"]);
    }

    #[test]
    fn test_pieces_consecutive_words() {
        let pieces: Vec<&str> = Separator::Word
            .pieces("a  b")
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        assert_eq!(pieces, vec!["a", " ", " b"]);
    }

    #[test]
    fn test_pieces_character_multibyte() {
        let pieces = Separator::Character.pieces("a世b");
        assert_eq!(pieces, vec![(0, "a"), (1, "世"), (4, "b")]);
    }

    #[test]
    fn test_pieces_reassemble() {
        let text = "# T\n\n## A\ntext\n\n## B\n### C\nmore text here\n";
        for separator in PRIORITY {
            let joined: String = separator.pieces(text).into_iter().map(|(_, p)| p).collect();
            assert_eq!(joined, text, "{separator:?}");
        }
    }

    #[test]
    fn test_pieces_offsets_match() {
        let text = "one two three";
        for (offset, piece) in Separator::Word.pieces(text) {
            assert_eq!(&text[offset..offset + piece.len()], piece);
        }
    }
}
