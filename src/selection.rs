//! Selection mapping: raw byte-offset selections reported by the
//! rendering layer become logical (verse, word) spans, and a tap point
//! becomes a word range via the boundary scanner.

use crate::builder::WordRangeIndex;
use crate::position::Span;
use log::debug;

/// Maps a half-open byte-offset selection `[start_offset, end_offset)`
/// within the last-built blob to a `Span`. The two endpoints map
/// independently: the start offset and the last included byte each snap to
/// their nearest word. Start/end keep drag direction; callers normalize.
///
/// `None` for an empty selection or an empty index; either means "no
/// selection", not an error.
pub fn span_for_range(
    book_id: &str,
    chapter: u32,
    start_offset: usize,
    end_offset: usize,
    words: &WordRangeIndex,
) -> Option<Span> {
    if end_offset <= start_offset {
        return None;
    }
    let start = words.position_at(start_offset)?;
    let end = words.position_at(end_offset - 1)?;
    Some(Span::new(book_id, chapter, start, end))
}

/// Live selection state over blob byte offsets, driven by the input
/// layer's mouse events. Anchor stays where the drag began; cursor follows
/// it. Purely positional; mapping to logical positions happens in
/// [`span_for_range`].
#[derive(Debug, Clone, Default)]
pub struct TextSelection {
    pub anchor: Option<usize>,
    pub cursor: Option<usize>,
    pub is_selecting: bool,
}

impl TextSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_selection(&mut self, offset: usize) {
        debug!("selection started at byte {offset}");
        self.anchor = Some(offset);
        self.cursor = Some(offset);
        self.is_selecting = true;
    }

    pub fn update_selection(&mut self, offset: usize) {
        if self.is_selecting {
            self.cursor = Some(offset);
        }
    }

    pub fn end_selection(&mut self) {
        self.is_selecting = false;
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
        self.cursor = None;
        self.is_selecting = false;
    }

    pub fn has_selection(&self) -> bool {
        self.anchor.is_some() && self.cursor.is_some()
    }

    /// Ordered half-open byte range covering both endpoints, regardless of
    /// drag direction.
    pub fn byte_range(&self) -> Option<(usize, usize)> {
        let (anchor, cursor) = (self.anchor?, self.cursor?);
        let (lo, hi) = if anchor <= cursor {
            (anchor, cursor)
        } else {
            (cursor, anchor)
        };
        Some((lo, hi + 1))
    }

    /// Select the word around `index` in `text` (tap/double-click entry
    /// point). No-op when no word can be found.
    pub fn select_word_at(&mut self, text: &str, index: usize) {
        if let Some((start, end)) = word_boundary(text, index) {
            self.anchor = Some(start);
            self.cursor = Some(end - 1);
            self.is_selecting = false;
        }
    }
}

/// Everything that is not alphanumeric breaks a word; this covers
/// whitespace and Unicode punctuation in one test.
fn is_breaker(ch: char) -> bool {
    !ch.is_alphanumeric()
}

/// Expands from `index` to the surrounding word's byte bounds.
///
/// When `index` itself sits on a breaker, scans forward past consecutive
/// breakers and uses the next word's bounds instead, so tapping between
/// words still yields a usable word. `None` when the buffer is empty or
/// holds no word at or after `index`. A returned range is always
/// non-empty.
pub fn word_boundary(text: &str, index: usize) -> Option<(usize, usize)> {
    if text.is_empty() {
        return None;
    }

    let mut index = index.min(text.len() - 1);
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }

    let ch = text[index..].chars().next()?;
    if is_breaker(ch) {
        index = text[index..]
            .char_indices()
            .find(|(_, c)| !is_breaker(*c))
            .map(|(i, _)| index + i)?;
    }

    let start = text[..index]
        .char_indices()
        .rev()
        .take_while(|(_, c)| !is_breaker(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(index);

    let end = text[index..]
        .char_indices()
        .find(|(_, c)| is_breaker(*c))
        .map(|(i, _)| index + i)
        .unwrap_or(text.len());

    Some((start, end))
}
