//! Terminal chapter reader: renders the built chapter, converts mouse
//! coordinates into blob byte offsets, and drives the live selection.

use crate::builder::{self, BuildKey, BuiltChapter};
use crate::chapter::Chapter;
use crate::highlight::{Highlight, HighlightColor};
use crate::position::{LogicalPosition, Span as WordSpan};
use crate::selection::{self, TextSelection};
use crate::theme::Base16Palette;
use log::debug;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthChar;

const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

pub struct ChapterReader {
    pub book_id: String,
    built: BuiltChapter,
    // Byte offset of each line's start in the flat blob
    line_offsets: Vec<usize>,
    pub scroll_offset: usize,
    pub selection: TextSelection,
    pub active_color: HighlightColor,
    last_inner_area: Option<Rect>,
    last_click: Option<(usize, Instant)>,
}

impl ChapterReader {
    pub fn new(
        book_id: &str,
        chapter: &Chapter,
        font_size: u16,
        highlights: &[Highlight],
        palette: &Base16Palette,
    ) -> Self {
        let built = builder::build_chapter(book_id, chapter, font_size, highlights, palette);
        let line_offsets = line_offsets(&built.raw);
        Self {
            book_id: book_id.to_string(),
            built,
            line_offsets,
            scroll_offset: 0,
            selection: TextSelection::new(),
            active_color: HighlightColor::Yellow,
            last_inner_area: None,
            last_click: None,
        }
    }

    pub fn built(&self) -> &BuiltChapter {
        &self.built
    }

    pub fn chapter_number(&self) -> u32 {
        self.built.key.chapter
    }

    /// Rebuilds only when the composite build key changed. A rebuild
    /// invalidates the index maps and any in-flight selection offsets, so
    /// the selection is dropped with it.
    pub fn rebuild_if_needed(
        &mut self,
        chapter: &Chapter,
        font_size: u16,
        highlights: &[Highlight],
        palette: &Base16Palette,
    ) {
        let key = BuildKey::new(&self.book_id, chapter.number, font_size, highlights);
        if key == self.built.key {
            return;
        }
        debug!("rebuilding chapter text for key {key}");
        self.built = builder::build_chapter(&self.book_id, chapter, font_size, highlights, palette);
        self.line_offsets = line_offsets(&self.built.raw);
        self.selection.clear_selection();
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Invalidates the cached build so the next [`Self::rebuild_if_needed`]
    /// rebuilds even with an unchanged key. Needed when the palette
    /// changes, which the key does not capture.
    pub fn invalidate(&mut self) {
        // A real signature is always a 32-char md5 hex string, so the
        // empty string can never collide with one.
        self.built.key.signature = String::new();
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    fn max_scroll(&self) -> usize {
        self.built.text.lines.len().saturating_sub(1)
    }

    pub fn handle_mouse_down(&mut self, x: u16, y: u16) {
        let Some(offset) = self.screen_to_offset(x, y) else {
            return;
        };

        let now = Instant::now();
        let double_click = matches!(
            self.last_click,
            Some((prev, at)) if prev == offset && now.duration_since(at) < DOUBLE_CLICK_WINDOW
        );
        self.last_click = Some((offset, now));

        if double_click {
            self.selection.select_word_at(&self.built.raw, offset);
        } else {
            self.selection.start_selection(offset);
        }
    }

    pub fn handle_mouse_drag(&mut self, x: u16, y: u16) {
        if !self.selection.is_selecting {
            return;
        }
        if let Some(offset) = self.screen_to_offset(x, y) {
            self.selection.update_selection(offset);
        }
    }

    pub fn handle_mouse_up(&mut self, x: u16, y: u16) {
        if let Some(offset) = self.screen_to_offset(x, y) {
            self.selection.update_selection(offset);
        }
        self.selection.end_selection();
    }

    /// The active selection as a logical span, drag direction preserved.
    pub fn current_span(&self) -> Option<WordSpan> {
        let (start, end) = self.selection.byte_range()?;
        selection::span_for_range(
            &self.book_id,
            self.chapter_number(),
            start,
            end,
            &self.built.words,
        )
    }

    /// Commits the active selection as a word-level highlight in the
    /// active color and clears the selection. `None` when nothing usable
    /// is selected (e.g. a chapter with no words).
    pub fn commit_highlight(&mut self) -> Option<Highlight> {
        let span = self.current_span()?;
        self.selection.clear_selection();
        Some(Highlight::word_level(span, self.active_color))
    }

    /// Logical position under the most recent mouse-down, for point-based
    /// actions like deleting the highlight under the cursor.
    pub fn position_under_cursor(&self) -> Option<LogicalPosition> {
        let (offset, _) = self.last_click?;
        self.built.words.position_at(offset)
    }

    /// Converts screen coordinates into a byte offset in the flat blob.
    /// Columns are display columns; wide glyphs count per their unicode
    /// width, mirroring how the terminal laid them out.
    pub fn screen_to_offset(&self, screen_x: u16, screen_y: u16) -> Option<usize> {
        let area = self.last_inner_area?;
        if screen_x < area.x || screen_y < area.y {
            return None;
        }
        let line = self.scroll_offset + (screen_y - area.y) as usize;
        let column = (screen_x - area.x) as usize;
        self.offset_at(line, column)
    }

    fn offset_at(&self, line: usize, column: usize) -> Option<usize> {
        let start = *self.line_offsets.get(line)?;
        let rest = &self.built.raw[start..];
        let line_text = rest.split('\n').next().unwrap_or(rest);

        let mut col = 0;
        for (i, ch) in line_text.char_indices() {
            let width = ch.width().unwrap_or(0).max(1);
            if column < col + width {
                return Some(start + i);
            }
            col += width;
        }
        // Past the end of the line: the newline position, which nearest-
        // match mapping resolves to the verse's last word.
        Some(start + line_text.len())
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, palette: &Base16Palette, title: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .border_style(Style::default().fg(palette.base_03));
        let inner = block.inner(area);
        self.last_inner_area = Some(inner);

        let paragraph = Paragraph::new(self.display_text(palette))
            .block(block)
            .style(Style::default().bg(palette.base_00))
            .scroll((self.scroll_offset as u16, 0));
        f.render_widget(paragraph, area);
    }

    /// The built text with the live selection painted over it. The built
    /// blob itself is never mutated; selection feedback is a per-frame
    /// restyle.
    fn display_text(&self, palette: &Base16Palette) -> Text<'static> {
        let Some(range) = self.selection.byte_range() else {
            return self.built.text.clone();
        };
        let (selection_bg, selection_fg) = palette.get_selection_colors(true);
        let style = Style::default().bg(selection_bg).fg(selection_fg);

        let lines = self
            .built
            .text
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                restyle_byte_range(line, self.line_offsets[i], range, style)
            })
            .collect::<Vec<_>>();
        Text::from(lines)
    }
}

fn line_offsets(raw: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut at = 0;
    for line in raw.split_inclusive('\n') {
        offsets.push(at);
        at += line.len();
    }
    offsets
}

/// Re-styles the part of `line` that falls inside the blob byte range
/// `[sel_start, sel_end)`, splitting spans at the boundaries. `line_start`
/// is the blob offset of the line's first byte.
fn restyle_byte_range(
    line: &Line<'_>,
    line_start: usize,
    (sel_start, sel_end): (usize, usize),
    style: Style,
) -> Line<'static> {
    let mut at = line_start;
    let mut spans: Vec<Span<'static>> = Vec::new();

    for span in &line.spans {
        let content = span.content.as_ref();
        let span_start = at;
        let span_end = at + content.len();
        at = span_end;

        let overlap_start = span_start.max(sel_start);
        let overlap_end = span_end.min(sel_end);
        if overlap_start >= overlap_end {
            spans.push(Span::styled(content.to_string(), span.style));
            continue;
        }

        // Selection ends are cursor+1 and may land inside a multi-byte
        // char; snap outward to char boundaries before slicing.
        let mut lo = overlap_start - span_start;
        while lo > 0 && !content.is_char_boundary(lo) {
            lo -= 1;
        }
        let mut hi = overlap_end - span_start;
        while hi < content.len() && !content.is_char_boundary(hi) {
            hi += 1;
        }
        if lo > 0 {
            spans.push(Span::styled(content[..lo].to_string(), span.style));
        }
        spans.push(Span::styled(
            content[lo..hi].to_string(),
            span.style.patch(style),
        ));
        if hi < content.len() {
            spans.push(Span::styled(content[hi..].to_string(), span.style));
        }
    }

    Line::from(spans)
}
