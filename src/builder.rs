//! Chapter text builder: turns a chapter's verses into one styled blob
//! plus the positional indexes the selection mapper works against.
//!
//! The blob exists in two forms that share one coordinate space: `raw`, a
//! flat string whose byte offsets are what the rendering layer reports
//! selections in, and `text`, the styled ratatui lines actually drawn.
//! Highlight tint is baked into `text` at build time; there is no separate
//! overlay pass for the caller to run.

use crate::chapter::Chapter;
use crate::highlight::Highlight;
use crate::overlay;
use crate::position::LogicalPosition;
use crate::theme::Base16Palette;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use std::fmt::Write as _;
use std::ops::Range;

/// One tokenized word: its byte range in the flat blob and its logical
/// address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub range: Range<usize>,
    pub pos: LogicalPosition,
}

/// Byte range -> logical position map for every tokenized word. Entries
/// are disjoint, non-empty and kept sorted by range start, so nearest
/// lookups are binary searches and tie-breaks are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordRangeIndex {
    entries: Vec<WordEntry>,
}

impl WordRangeIndex {
    /// Build an index from arbitrary entries. Sorted on construction;
    /// ranges are expected to be disjoint.
    pub fn from_entries(mut entries: Vec<WordEntry>) -> Self {
        entries.sort_by_key(|e| e.range.start);
        Self { entries }
    }

    fn push(&mut self, range: Range<usize>, pos: LogicalPosition) {
        debug_assert!(!range.is_empty());
        debug_assert!(
            self.entries
                .last()
                .map(|e| e.range.end <= range.start)
                .unwrap_or(true)
        );
        self.entries.push(WordEntry { range, pos });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter()
    }

    /// Maps a raw byte offset back to the word it falls in, or the nearest
    /// word by byte distance when it falls between words. Distance is
    /// measured to the closest included byte of a range; equal distances
    /// resolve to the earlier position. `None` only for an empty index.
    pub fn position_at(&self, offset: usize) -> Option<LogicalPosition> {
        if self.entries.is_empty() {
            return None;
        }

        // First entry starting past the offset.
        let idx = self.entries.partition_point(|e| e.range.start <= offset);

        let mut best: Option<(usize, LogicalPosition)> = None;
        if idx > 0 {
            let before = &self.entries[idx - 1];
            if offset < before.range.end {
                return Some(before.pos);
            }
            best = Some((offset - (before.range.end - 1), before.pos));
        }
        if idx < self.entries.len() {
            let after = &self.entries[idx];
            let distance = after.range.start - offset;
            let closer = match best {
                Some((best_distance, _)) => distance < best_distance,
                None => true,
            };
            if closer {
                best = Some((distance, after.pos));
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Byte range of the word at `pos`, if it was tokenized.
    pub fn range_of(&self, pos: LogicalPosition) -> Option<Range<usize>> {
        self.entries
            .iter()
            .find(|e| e.pos == pos)
            .map(|e| e.range.clone())
    }
}

/// Offsets of the single-space separators between words of the same verse,
/// each keyed to the preceding word's position so a tint can bridge two
/// adjacent highlighted words. Verse-final newlines are not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpacingIndex {
    entries: Vec<(usize, LogicalPosition)>,
}

impl SpacingIndex {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, LogicalPosition)> {
        self.entries.iter()
    }

    pub fn position_at(&self, offset: usize) -> Option<LogicalPosition> {
        self.entries
            .iter()
            .find(|(at, _)| *at == offset)
            .map(|(_, pos)| *pos)
    }
}

/// Output of one build pass. The index maps are valid only for this blob;
/// a caller must never mix offsets across build generations.
#[derive(Debug, Clone)]
pub struct BuiltChapter {
    pub key: BuildKey,
    pub text: Text<'static>,
    pub raw: String,
    pub words: WordRangeIndex,
    pub spacing: SpacingIndex,
}

/// Composite cache key gating rebuilds. The core itself is stateless; the
/// caller compares keys to skip redundant builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildKey {
    pub book_id: String,
    pub chapter: u32,
    pub font_size: u16,
    pub signature: String,
}

impl BuildKey {
    pub fn new(book_id: &str, chapter: u32, font_size: u16, highlights: &[Highlight]) -> Self {
        Self {
            book_id: book_id.to_string(),
            chapter,
            font_size,
            signature: highlight_signature(highlights),
        }
    }
}

impl std::fmt::Display for BuildKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.book_id, self.chapter, self.font_size, self.signature
        )
    }
}

/// Stable digest of everything about a highlight list that affects the
/// built output: id, verse range, normalized word-span endpoints, color.
/// Notes are excluded; editing a note must not force a rebuild.
pub fn highlight_signature(highlights: &[Highlight]) -> String {
    let mut buf = String::new();
    for h in highlights {
        let _ = write!(
            buf,
            "{}|{}|{}|{}|{}|",
            h.id, h.range.book_id, h.range.chapter, h.range.start_verse, h.range.end_verse
        );
        if let Some(span) = &h.word_span {
            let (start, end) = span.ordered();
            let _ = write!(
                buf,
                "{}:{}-{}:{}|",
                start.verse, start.word_index, end.verse, end.word_index
            );
        }
        let _ = write!(buf, "{};", h.color);
    }
    format!("{:x}", md5::compute(buf.as_bytes()))
}

/// Tokenizes `chapter` into a styled blob with highlight tint applied and
/// both index maps populated.
///
/// Per verse, in order: a verse-number label segment, the verse's
/// whitespace-delimited tokens joined by single spaces, then a newline.
/// Punctuation stays attached to its token. An empty or whitespace-only
/// verse still emits its label and line break. The label, word, separator
/// and newline segments together cover `raw` exactly, without overlap.
///
/// Tokenization never fails; malformed verse text just produces fewer
/// words. `font_size` cannot change terminal glyphs and only participates
/// in the build key, for parity with frontends where it invalidates
/// layout.
pub fn build_chapter(
    book_id: &str,
    chapter: &Chapter,
    font_size: u16,
    highlights: &[Highlight],
    palette: &Base16Palette,
) -> BuiltChapter {
    let mut raw = String::new();
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut words = WordRangeIndex::default();
    let mut spacing = SpacingIndex::default();

    let label_style = Style::default().fg(palette.verse_label_fg());
    let word_style = Style::default().fg(palette.text_fg());

    for verse in &chapter.verses {
        let mut spans: Vec<Span<'static>> = Vec::new();

        let label = format!("{} ", verse.number);
        raw.push_str(&label);
        spans.push(Span::styled(label, label_style));

        let tokens: Vec<&str> = verse.text.split_whitespace().collect();
        for (i, token) in tokens.iter().enumerate() {
            let pos = LogicalPosition::new(verse.number, i as u32);
            let start = raw.len();
            raw.push_str(token);
            words.push(start..raw.len(), pos);

            spans.push(Span::styled(
                (*token).to_string(),
                tinted(word_style, pos, book_id, chapter.number, highlights, palette),
            ));

            if i + 1 < tokens.len() {
                let sep_at = raw.len();
                raw.push(' ');
                spacing.entries.push((sep_at, pos));
                spans.push(Span::styled(
                    " ".to_string(),
                    tinted(word_style, pos, book_id, chapter.number, highlights, palette),
                ));
            }
        }

        raw.push('\n');
        lines.push(Line::from(spans));
    }

    BuiltChapter {
        key: BuildKey::new(book_id, chapter.number, font_size, highlights),
        text: Text::from(lines),
        raw,
        words,
        spacing,
    }
}

fn tinted(
    base: Style,
    pos: LogicalPosition,
    book_id: &str,
    chapter: u32,
    highlights: &[Highlight],
    palette: &Base16Palette,
) -> Style {
    match overlay::color_for(pos, book_id, chapter, highlights) {
        Some(color) => base
            .bg(palette.highlight_bg(color))
            .fg(palette.highlight_fg()),
        None => base,
    }
}
