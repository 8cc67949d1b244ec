//! Static style table for terminal rendering.
//!
//! All colors used by the renderer live here as constants; nothing mutates
//! styling at runtime.

use crossterm::style::Color;

/// One card accent: strong color for the border and title, soft color for
/// backgrounds in hosts that support them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accent {
    pub hex: &'static str,
    pub soft_hex: &'static str,
    pub rgb: (u8, u8, u8),
}

impl Accent {
    const fn new(hex: &'static str, soft_hex: &'static str, rgb: (u8, u8, u8)) -> Self {
        Self { hex, soft_hex, rgb }
    }

    pub fn color(&self) -> Color {
        rgb(self.rgb)
    }
}

/// Accents indexed by [`ThemeToken::index`](crate::theme::ThemeToken::index).
pub const ACCENTS: [Accent; 8] = [
    Accent::new("#6366f1", "#eef2ff", (99, 102, 241)),
    Accent::new("#10b981", "#ecfdf5", (16, 185, 129)),
    Accent::new("#f59e0b", "#fffbeb", (245, 158, 11)),
    Accent::new("#f43f5e", "#fff1f2", (244, 63, 94)),
    Accent::new("#0ea5e9", "#f0f9ff", (14, 165, 233)),
    Accent::new("#8b5cf6", "#f5f3ff", (139, 92, 246)),
    Accent::new("#14b8a6", "#f0fdfa", (20, 184, 166)),
    Accent::new("#f97316", "#fff7ed", (249, 115, 22)),
];

/// Error banner text.
pub const ERROR_FG: (u8, u8, u8) = (153, 27, 27);
/// Secondary text: handles, labels, summary lines.
pub const MUTED_FG: (u8, u8, u8) = (107, 114, 128);

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Card frame glyphs.
pub const CARD_CORNER: &str = "╭";
pub const CARD_EDGE: &str = "│";
pub const CARD_FOOT: &str = "╰";
pub const CARD_RULE: char = '─';
