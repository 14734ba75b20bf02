use crate::highlight::HighlightColor;
use ratatui::style::Color;
use std::sync::atomic::{AtomicUsize, Ordering};

// Color palette structure
#[derive(Clone)]
pub struct Base16Palette {
    pub base_00: Color, // Background
    pub base_01: Color, // Lighter background
    pub base_02: Color, // Selection background
    pub base_03: Color, // Comments, verse numbers
    pub base_04: Color, // Dark foreground
    pub base_05: Color, // Default foreground
    pub base_06: Color, // Light foreground
    pub base_07: Color, // Light background
    pub base_08: Color, // Red
    pub base_09: Color, // Orange
    pub base_0a: Color, // Yellow
    pub base_0b: Color, // Green
    pub base_0c: Color, // Cyan
    pub base_0d: Color, // Blue
    pub base_0e: Color, // Purple
    pub base_0f: Color, // Brown
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ThemeId {
    OceanicNext = 0,
    CatppuccinMocha = 1,
}

impl ThemeId {
    pub fn name(&self) -> &'static str {
        match self {
            ThemeId::OceanicNext => "Oceanic Next",
            ThemeId::CatppuccinMocha => "Catppuccin Mocha",
        }
    }

    pub fn all() -> &'static [ThemeId] {
        &[ThemeId::OceanicNext, ThemeId::CatppuccinMocha]
    }

    fn from_index(idx: usize) -> Self {
        match idx {
            0 => ThemeId::OceanicNext,
            1 => ThemeId::CatppuccinMocha,
            _ => ThemeId::OceanicNext,
        }
    }
}

static CURRENT_THEME_INDEX: AtomicUsize = AtomicUsize::new(0);

pub fn current_theme_id() -> ThemeId {
    ThemeId::from_index(CURRENT_THEME_INDEX.load(Ordering::Relaxed))
}

pub fn set_theme(theme: ThemeId) {
    CURRENT_THEME_INDEX.store(theme as usize, Ordering::Relaxed);
}

pub fn toggle_theme() -> ThemeId {
    let next = match current_theme_id() {
        ThemeId::OceanicNext => ThemeId::CatppuccinMocha,
        ThemeId::CatppuccinMocha => ThemeId::OceanicNext,
    };
    set_theme(next);
    next
}

pub fn current_theme() -> &'static Base16Palette {
    match current_theme_id() {
        ThemeId::OceanicNext => &OCEANIC_NEXT_PALETTE,
        ThemeId::CatppuccinMocha => &CATPPUCCIN_MOCHA_PALETTE,
    }
}

// Oceanic Next theme
static OCEANIC_NEXT_PALETTE: Base16Palette = Base16Palette {
    base_00: Color::Rgb(0x1B, 0x2B, 0x34),
    base_01: Color::Rgb(0x34, 0x3D, 0x46),
    base_02: Color::Rgb(0x4F, 0x5B, 0x66),
    base_03: Color::Rgb(0x65, 0x73, 0x7E),
    base_04: Color::Rgb(0xA7, 0xAD, 0xBA),
    base_05: Color::Rgb(0xC0, 0xC5, 0xCE),
    base_06: Color::Rgb(0xCD, 0xD3, 0xDE),
    base_07: Color::Rgb(0xF0, 0xF4, 0xF8),
    base_08: Color::Rgb(0xEC, 0x5F, 0x67),
    base_09: Color::Rgb(0xF9, 0x91, 0x57),
    base_0a: Color::Rgb(0xFA, 0xC8, 0x63),
    base_0b: Color::Rgb(0x99, 0xC7, 0x94),
    base_0c: Color::Rgb(0x5F, 0xB3, 0xB3),
    base_0d: Color::Rgb(0x66, 0x99, 0xCC),
    base_0e: Color::Rgb(0xC5, 0x94, 0xC5),
    base_0f: Color::Rgb(0xAB, 0x79, 0x67),
};

// Catppuccin Mocha theme
// Mapped from: base=#1E1E2E, surface0=#313244, surface1=#45475A,
// overlay0=#6C7086, overlay1=#7F849C, subtext0=#A6ADC8, text=#CDD6F4,
// rosewater=#F5E0DC, red=#F38BA8, peach=#FAB387, yellow=#F9E2AF,
// green=#A6E3A1, teal=#94E2D5, blue=#89B4FA, mauve=#CBA6F7, maroon=#EBA0AC
static CATPPUCCIN_MOCHA_PALETTE: Base16Palette = Base16Palette {
    base_00: Color::Rgb(0x1E, 0x1E, 0x2E),
    base_01: Color::Rgb(0x31, 0x32, 0x44),
    base_02: Color::Rgb(0x45, 0x47, 0x5A),
    base_03: Color::Rgb(0x6C, 0x70, 0x86),
    base_04: Color::Rgb(0x7F, 0x84, 0x9C),
    base_05: Color::Rgb(0xA6, 0xAD, 0xC8),
    base_06: Color::Rgb(0xCD, 0xD6, 0xF4),
    base_07: Color::Rgb(0xF5, 0xE0, 0xDC),
    base_08: Color::Rgb(0xF3, 0x8B, 0xA8),
    base_09: Color::Rgb(0xFA, 0xB3, 0x87),
    base_0a: Color::Rgb(0xF9, 0xE2, 0xAF),
    base_0b: Color::Rgb(0xA6, 0xE3, 0xA1),
    base_0c: Color::Rgb(0x94, 0xE2, 0xD5),
    base_0d: Color::Rgb(0x89, 0xB4, 0xFA),
    base_0e: Color::Rgb(0xCB, 0xA6, 0xF7),
    base_0f: Color::Rgb(0xEB, 0xA0, 0xAC),
};

impl Base16Palette {
    /// Pure mapping from the highlight color enum to the concrete
    /// background tint of this palette.
    pub fn highlight_bg(&self, color: HighlightColor) -> Color {
        match color {
            HighlightColor::Yellow => self.base_0a,
            HighlightColor::Green => self.base_0b,
            HighlightColor::Blue => self.base_0d,
            HighlightColor::Pink => self.base_0e,
            HighlightColor::Orange => self.base_09,
        }
    }

    /// Foreground used on top of a highlight tint; tints are light, so the
    /// darkest palette entry keeps the word legible.
    pub fn highlight_fg(&self) -> Color {
        self.base_00
    }

    pub fn verse_label_fg(&self) -> Color {
        self.base_03
    }

    pub fn text_fg(&self) -> Color {
        self.base_05
    }

    // Get selection colors for focused/unfocused states
    pub fn get_selection_colors(&self, is_focused: bool) -> (Color, Color) {
        if is_focused {
            (self.base_02, self.base_06)
        } else {
            (self.base_02, self.base_03)
        }
    }
}
