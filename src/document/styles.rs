//! Palette, sizes and the named paragraph styles registered in every output.
//!
//! Sizes are half-points, indents and spacing twips, as docx-rs expects.

use docx_rs::{Docx, RunFonts, Style, StyleType};

// ── Palette ──────────────────────────────────────────────────────────────

/// Title, headings and the "Solution" header.
pub const ACCENT_COLOR: &str = "1F4E79";
pub const LINK_COLOR: &str = "0563C1";
pub const INLINE_CODE_COLOR: &str = "C7254E";
pub const CODE_BLOCK_COLOR: &str = "2F2F2F";
pub const CODE_SHADING: &str = "F2F2F2";
/// Blockquote text and border.
pub const MUTED_COLOR: &str = "666666";

pub const MONOSPACE_FONT: &str = "Courier New";

// ── Sizes ────────────────────────────────────────────────────────────────

pub const BODY_SIZE: usize = 24;
pub const INLINE_CODE_SIZE: usize = 22;
pub const CODE_BLOCK_SIZE: usize = 20;
pub const TITLE_SIZE: usize = 48;
pub const SECTION_HEADER_SIZE: usize = 36;
/// Largest heading (level 1).
pub const HEADING_MAX_SIZE: usize = 32;
/// Smallest heading size, whatever the level.
pub const HEADING_MIN_SIZE: usize = 20;

// ── Layout ───────────────────────────────────────────────────────────────

pub const LIST_INDENT: i32 = 720;
pub const CODE_INDENT: i32 = 360;
pub const QUOTE_INDENT: i32 = 720;
pub const CODE_SPACING: (u32, u32) = (120, 120);
pub const RULE_SPACING: (u32, u32) = (240, 240);
/// Underscores in the stand-in horizontal rule.
pub const RULE_WIDTH: usize = 50;
/// Rendered logo width.
pub const LOGO_WIDTH_PX: u32 = 150;

/// Font size for a heading level already clamped to 1–6.
pub fn heading_size(level: u8) -> usize {
    let step = usize::from(level.saturating_sub(1)) * 4;
    HEADING_MAX_SIZE.saturating_sub(step).max(HEADING_MIN_SIZE)
}

/// Style id docx-rs uses for a heading level, e.g. `"Heading2"`.
pub fn heading_style_id(level: u8) -> &'static str {
    match level {
        1 => "Heading1",
        2 => "Heading2",
        3 => "Heading3",
        4 => "Heading4",
        5 => "Heading5",
        _ => "Heading6",
    }
}

pub fn monospace_fonts() -> RunFonts {
    RunFonts::new()
        .ascii(MONOSPACE_FONT)
        .hi_ansi(MONOSPACE_FONT)
        .east_asia(MONOSPACE_FONT)
        .cs(MONOSPACE_FONT)
}

fn heading_style(level: u8) -> Style {
    Style::new(heading_style_id(level), StyleType::Paragraph)
        .name(format!("Heading {level}"))
        .size(heading_size(level))
        .color(ACCENT_COLOR)
        .bold()
}

/// Register the heading styles so headings show up in the navigation pane.
pub fn register_styles(docx: Docx) -> Docx {
    (1..=6).fold(docx, |docx, level| docx.add_style(heading_style(level)))
}
