use crate::position::{Span, VerseRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// The five user-facing highlight colors. Mapped to concrete RGB values by
/// the active theme palette, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Yellow,
    Green,
    Blue,
    Pink,
    Orange,
}

impl HighlightColor {
    pub fn all() -> &'static [HighlightColor] {
        &[
            HighlightColor::Yellow,
            HighlightColor::Green,
            HighlightColor::Blue,
            HighlightColor::Pink,
            HighlightColor::Orange,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Green => "green",
            HighlightColor::Blue => "blue",
            HighlightColor::Pink => "pink",
            HighlightColor::Orange => "orange",
        }
    }

    /// Next color in palette order, wrapping around. Used by the reader's
    /// color cycling key.
    pub fn next(&self) -> HighlightColor {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown highlight color: {0}")]
pub struct ParseColorError(String);

impl FromStr for HighlightColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HighlightColor::all()
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// A persisted highlight. `range` is always present and is what survives a
/// translation switch; `word_span`, when present, refines rendering to
/// exact word boundaries within `range`.
///
/// Mutation is full replacement keyed by `id`; there are no partial field
/// updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: Uuid,
    pub range: VerseRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_span: Option<Span>,
    pub color: HighlightColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Highlight {
    /// Verse-granularity highlight (the legacy selection path).
    pub fn verse_level(range: VerseRange, color: HighlightColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            range,
            word_span: None,
            color,
            note: None,
        }
    }

    /// Word-granularity highlight. The span is normalized on construction
    /// and its verse collapse becomes the portable `range`.
    pub fn word_level(span: Span, color: HighlightColor) -> Self {
        let range = span.to_verse_range();
        Self {
            id: Uuid::new_v4(),
            range,
            word_span: Some(span.normalize()),
            color,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
