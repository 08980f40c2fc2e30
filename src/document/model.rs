//! Output-side data model: styled runs grouped into paragraph-level blocks.
//!
//! Nothing here knows about docx-rs. Blocks are plain data so the converter
//! can be tested by inspecting structure instead of unpacking XML.

use crate::document::styles::BODY_SIZE;
use serde::{Deserialize, Serialize};

/// An atomic span of text and its formatting.
///
/// Sizes are in half-points (24 = 12pt). Colours are 6-digit hex without `#`;
/// `None` means the document default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub monospace: bool,
    pub color: Option<String>,
    pub size: usize,
}

impl StyledRun {
    /// Unstyled body text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            underline: false,
            monospace: false,
            color: None,
            size: BODY_SIZE,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }

    pub fn color(mut self, hex: &str) -> Self {
        self.color = Some(hex.to_string());
        self
    }

    pub fn size(mut self, half_points: usize) -> Self {
        self.size = half_points;
        self
    }
}

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// A single-line paragraph border.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Border {
    pub color: String,
    /// Eighths of a point.
    pub size: usize,
    /// Gap between border and text, in points.
    pub space: usize,
}

/// Logo bytes plus their pixel dimensions.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LogoImage {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl std::fmt::Debug for LogoImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoImage")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .finish()
    }
}

/// What a block renders as.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum BlockKind {
    /// Runs of text (the common case).
    #[default]
    Paragraph,
    /// A hard page break; its runs carry no visible text.
    PageBreak,
    /// An embedded picture, scaled to `width_px` wide.
    Image { logo: LogoImage, width_px: u32 },
}

/// One paragraph-equivalent unit of the output document.
///
/// The run list is never empty: constructors substitute a single empty-text
/// run so the writer never emits a degenerate paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentBlock {
    runs: Vec<StyledRun>,
    pub kind: BlockKind,
    /// Heading level 1–6, `None` for body text.
    pub heading: Option<u8>,
    pub alignment: Alignment,
    /// Left indent in twips (1/20 pt).
    pub indent_left: Option<i32>,
    /// `(before, after)` in twips.
    pub spacing: Option<(u32, u32)>,
    pub border_left: Option<Border>,
    /// Background fill applied to every run, hex colour.
    pub shading: Option<String>,
}

impl DocumentBlock {
    pub fn new(mut runs: Vec<StyledRun>) -> Self {
        if runs.is_empty() {
            runs.push(StyledRun::plain(""));
        }
        Self {
            runs,
            kind: BlockKind::Paragraph,
            heading: None,
            alignment: Alignment::Left,
            indent_left: None,
            spacing: None,
            border_left: None,
            shading: None,
        }
    }

    pub fn page_break() -> Self {
        Self {
            kind: BlockKind::PageBreak,
            ..Self::new(Vec::new())
        }
    }

    pub fn image(logo: LogoImage, width_px: u32) -> Self {
        Self {
            kind: BlockKind::Image { logo, width_px },
            alignment: Alignment::Center,
            ..Self::new(Vec::new())
        }
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn with_heading(mut self, level: u8) -> Self {
        self.heading = Some(level);
        self
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    pub fn indent_left(mut self, twips: i32) -> Self {
        self.indent_left = Some(twips);
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing = Some((before, after));
        self
    }

    pub fn border_left(mut self, border: Border) -> Self {
        self.border_left = Some(border);
        self
    }

    pub fn shading(mut self, hex: &str) -> Self {
        self.shading = Some(hex.to_string());
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Who the solution is for; printed on the cover page.
///
/// Values are passed through as given, empty strings included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIdentity {
    pub name: String,
    pub roll_number: String,
}

impl StudentIdentity {
    pub fn new(name: impl Into<String>, roll_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roll_number: roll_number.into(),
        }
    }
}

/// Everything one solve request puts into its output document.
///
/// Built once and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolvedDocument {
    pub logo: Option<LogoImage>,
    pub title: String,
    pub student: StudentIdentity,
    pub blocks: Vec<DocumentBlock>,
}
