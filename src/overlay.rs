//! Decides which background tint, if any, a word (or the gap after it)
//! receives from the active highlight set.

use crate::highlight::{Highlight, HighlightColor};
use crate::position::LogicalPosition;

/// Returns the color of the first highlight in list order that covers
/// `pos`, or `None`.
///
/// First match wins: when highlights overlap, the one appearing earlier in
/// the list determines the tint. The store hands highlights out in
/// insertion order, so earlier-created highlights take precedence.
///
/// Highlights for another book or chapter, or whose verse interval does not
/// cover `pos`, are inert rather than an error.
pub fn color_for(
    pos: LogicalPosition,
    book_id: &str,
    chapter: u32,
    highlights: &[Highlight],
) -> Option<HighlightColor> {
    highlight_at(pos, book_id, chapter, highlights).map(|h| h.color)
}

/// The first highlight in list order covering `pos`, or `None`. Same
/// matching rules as [`color_for`]; used for point actions such as
/// deleting the highlight under the cursor.
pub fn highlight_at<'a>(
    pos: LogicalPosition,
    book_id: &str,
    chapter: u32,
    highlights: &'a [Highlight],
) -> Option<&'a Highlight> {
    highlights.iter().find(|h| {
        if h.range.book_id != book_id || h.range.chapter != chapter {
            return false;
        }
        if !h.range.contains_verse(pos.verse) {
            return false;
        }
        match &h.word_span {
            // Word-level highlight: inclusive containment on normalized
            // endpoints.
            Some(span) => span.contains(pos),
            // Verse-level highlight: every word of the covered verses.
            None => true,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Span, VerseRange};

    fn verse_highlight(start: u32, end: u32, color: HighlightColor) -> Highlight {
        Highlight::verse_level(VerseRange::new("john", 10, start, end), color)
    }

    #[test]
    fn test_verse_level_covers_every_word_in_range() {
        let highlights = vec![verse_highlight(3, 6, HighlightColor::Yellow)];

        for verse in 3..=6 {
            for word_index in [0, 1, 17] {
                assert_eq!(
                    color_for(
                        LogicalPosition::new(verse, word_index),
                        "john",
                        10,
                        &highlights
                    ),
                    Some(HighlightColor::Yellow)
                );
            }
        }
        assert_eq!(
            color_for(LogicalPosition::new(2, 0), "john", 10, &highlights),
            None
        );
        assert_eq!(
            color_for(LogicalPosition::new(7, 0), "john", 10, &highlights),
            None
        );
    }

    #[test]
    fn test_word_level_bounds_are_inclusive() {
        let span = Span::new(
            "john",
            10,
            LogicalPosition::new(3, 1),
            LogicalPosition::new(3, 3),
        );
        let highlights = vec![Highlight::word_level(span, HighlightColor::Green)];

        assert_eq!(
            color_for(LogicalPosition::new(3, 0), "john", 10, &highlights),
            None
        );
        for word_index in 1..=3 {
            assert_eq!(
                color_for(LogicalPosition::new(3, word_index), "john", 10, &highlights),
                Some(HighlightColor::Green)
            );
        }
        assert_eq!(
            color_for(LogicalPosition::new(3, 4), "john", 10, &highlights),
            None
        );
    }

    #[test]
    fn test_word_level_skips_verses_outside_range() {
        // Span normalization happens inside Highlight::word_level even for
        // a backwards drag.
        let span = Span::new(
            "john",
            10,
            LogicalPosition::new(11, 3),
            LogicalPosition::new(10, 1),
        );
        let highlights = vec![Highlight::word_level(span, HighlightColor::Pink)];

        assert_eq!(
            color_for(LogicalPosition::new(10, 0), "john", 10, &highlights),
            None
        );
        assert_eq!(
            color_for(LogicalPosition::new(10, 1), "john", 10, &highlights),
            Some(HighlightColor::Pink)
        );
        assert_eq!(
            color_for(LogicalPosition::new(11, 3), "john", 10, &highlights),
            Some(HighlightColor::Pink)
        );
        assert_eq!(
            color_for(LogicalPosition::new(11, 4), "john", 10, &highlights),
            None
        );
    }

    #[test]
    fn test_wrong_book_or_chapter_is_inert() {
        let highlights = vec![verse_highlight(1, 50, HighlightColor::Blue)];
        assert_eq!(
            color_for(LogicalPosition::new(1, 0), "mark", 10, &highlights),
            None
        );
        assert_eq!(
            color_for(LogicalPosition::new(1, 0), "john", 11, &highlights),
            None
        );
    }

    #[test]
    fn test_first_highlight_in_list_wins_on_overlap() {
        let highlights = vec![
            verse_highlight(3, 5, HighlightColor::Orange),
            verse_highlight(4, 6, HighlightColor::Blue),
        ];
        assert_eq!(
            color_for(LogicalPosition::new(4, 2), "john", 10, &highlights),
            Some(HighlightColor::Orange)
        );
        // Outside the first highlight the second still applies.
        assert_eq!(
            color_for(LogicalPosition::new(6, 0), "john", 10, &highlights),
            Some(HighlightColor::Blue)
        );
    }
}
