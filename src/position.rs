use serde::{Deserialize, Serialize};
use std::fmt;

/// The durable, tokenization-derived address of a word within a chapter:
/// verse number (1-based) plus word index (0-based, assigned in
/// tokenization order per verse).
///
/// Field order gives the derived `Ord` the lexicographic
/// `(verse, word_index)` compare used everywhere for span ordering and
/// containment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct LogicalPosition {
    pub verse: u32,
    pub word_index: u32,
}

impl LogicalPosition {
    pub fn new(verse: u32, word_index: u32) -> Self {
        Self { verse, word_index }
    }
}

/// A user's word-level selection. Not inherently ordered: `start`/`end`
/// reflect drag direction, not document order. Use [`Span::normalize`]
/// before storing or comparing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub book_id: String,
    pub chapter: u32,
    pub start: LogicalPosition,
    pub end: LogicalPosition,
}

impl Span {
    pub fn new(
        book_id: impl Into<String>,
        chapter: u32,
        start: LogicalPosition,
        end: LogicalPosition,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            chapter,
            start,
            end,
        }
    }

    /// Endpoints in document order.
    pub fn ordered(&self) -> (LogicalPosition, LogicalPosition) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Canonical copy with `start <= end`. Idempotent.
    pub fn normalize(&self) -> Span {
        let (start, end) = self.ordered();
        Span {
            book_id: self.book_id.clone(),
            chapter: self.chapter,
            start,
            end,
        }
    }

    /// Inclusive containment under the `(verse, word_index)` ordering.
    pub fn contains(&self, pos: LogicalPosition) -> bool {
        let (start, end) = self.ordered();
        start <= pos && pos <= end
    }

    /// Collapse to the storage-portable verse interval. Word indexes are
    /// dropped; translations with different tokenization can still apply
    /// the result.
    pub fn to_verse_range(&self) -> VerseRange {
        let (start, end) = self.ordered();
        VerseRange {
            book_id: self.book_id.clone(),
            chapter: self.chapter,
            start_verse: start.verse,
            end_verse: end.verse,
        }
    }
}

/// Inclusive verse-number interval within one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRange {
    pub book_id: String,
    pub chapter: u32,
    pub start_verse: u32,
    pub end_verse: u32,
}

impl VerseRange {
    pub fn new(book_id: impl Into<String>, chapter: u32, start_verse: u32, end_verse: u32) -> Self {
        Self {
            book_id: book_id.into(),
            chapter,
            start_verse: start_verse.min(end_verse),
            end_verse: start_verse.max(end_verse),
        }
    }

    pub fn single(book_id: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self::new(book_id, chapter, verse, verse)
    }

    pub fn contains_verse(&self, verse: u32) -> bool {
        self.start_verse <= verse && verse <= self.end_verse
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_verse == self.end_verse {
            write!(f, "{} {}:{}", self.book_id, self.chapter, self.start_verse)
        } else {
            write!(
                f,
                "{} {}:{}-{}",
                self.book_id, self.chapter, self.start_verse, self.end_verse
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: (u32, u32), end: (u32, u32)) -> Span {
        Span::new(
            "john",
            3,
            LogicalPosition::new(start.0, start.1),
            LogicalPosition::new(end.0, end.1),
        )
    }

    #[test]
    fn test_position_ordering_is_lexicographic() {
        assert!(LogicalPosition::new(2, 9) < LogicalPosition::new(3, 0));
        assert!(LogicalPosition::new(3, 1) < LogicalPosition::new(3, 2));
        assert_eq!(LogicalPosition::new(3, 1), LogicalPosition::new(3, 1));
    }

    #[test]
    fn test_normalize_reorders_backwards_selection() {
        let backwards = span((11, 3), (10, 1));
        let normalized = backwards.normalize();
        assert_eq!(normalized.start, LogicalPosition::new(10, 1));
        assert_eq!(normalized.end, LogicalPosition::new(11, 3));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in [span((11, 3), (10, 1)), span((5, 0), (5, 0)), span((2, 4), (7, 1))] {
            let once = s.normalize();
            assert_eq!(once.normalize(), once);
        }
    }

    #[test]
    fn test_collapse_is_monotonic() {
        for s in [span((11, 3), (10, 1)), span((5, 2), (5, 2)), span((9, 0), (4, 7))] {
            let range = s.to_verse_range();
            assert!(range.start_verse <= range.end_verse);
        }
    }

    #[test]
    fn test_contains_is_inclusive() {
        let s = span((3, 1), (3, 3));
        assert!(!s.contains(LogicalPosition::new(3, 0)));
        assert!(s.contains(LogicalPosition::new(3, 1)));
        assert!(s.contains(LogicalPosition::new(3, 3)));
        assert!(!s.contains(LogicalPosition::new(3, 4)));
    }

    #[test]
    fn test_verse_range_display() {
        assert_eq!(VerseRange::single("john", 3, 16).to_string(), "john 3:16");
        assert_eq!(VerseRange::new("john", 3, 16, 18).to_string(), "john 3:16-18");
    }
}
