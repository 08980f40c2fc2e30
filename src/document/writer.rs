//! DocumentBlock → DOCX bytes via docx-rs.
//!
//! One block is one `w:p`. Newlines inside a run become text-wrapping breaks
//! so multi-line code keeps its shape. Characters XML 1.0 cannot carry are
//! dropped here, so model output and cover fields never yield a part Word
//! refuses to open.

use crate::document::model::{Alignment, BlockKind, DocumentBlock, LogoImage, StyledRun};
use crate::document::styles::{heading_style_id, monospace_fonts, register_styles};
use crate::error::SolveError;
use docx_rs::{
    AlignmentType, BorderType, BreakType, Docx, LineSpacing, Paragraph, ParagraphBorder,
    ParagraphBorderPosition, ParagraphBorders, Pic, Run, Shading,
};
use std::borrow::Cow;
use std::io::Cursor;
use tracing::debug;

/// EMU per pixel at 96 DPI.
const EMU_PER_PX: u32 = 9525;

/// Pack blocks into a complete `.docx` file.
pub fn write_docx(blocks: &[DocumentBlock]) -> Result<Vec<u8>, SolveError> {
    let docx = blocks
        .iter()
        .fold(register_styles(Docx::new()), |docx, block| {
            docx.add_paragraph(build_paragraph(block))
        });

    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|e| SolveError::Serialization(e.to_string()))?;

    debug!("Packed {} blocks into {} bytes", blocks.len(), buffer.len());
    Ok(buffer)
}

fn build_paragraph(block: &DocumentBlock) -> Paragraph {
    let mut para = Paragraph::new();

    match &block.kind {
        BlockKind::Paragraph => {
            for styled in block.runs() {
                para = para.add_run(build_run(styled, block.shading.as_deref()));
            }
        }
        BlockKind::PageBreak => {
            para = para.add_run(Run::new().add_break(BreakType::Page));
        }
        BlockKind::Image { logo, width_px } => {
            para = para.add_run(Run::new().add_image(build_pic(logo, *width_px)));
        }
    }

    if let Some(level) = block.heading {
        para = para.style(heading_style_id(level));
    }
    if block.alignment == Alignment::Center {
        para = para.align(AlignmentType::Center);
    }
    if let Some(left) = block.indent_left {
        para = para.indent(Some(left), None, None, None);
    }
    if let Some((before, after)) = block.spacing {
        para = para.line_spacing(LineSpacing::new().before(before).after(after));
    }
    if let Some(border) = &block.border_left {
        para = para.set_borders(
            ParagraphBorders::with_empty().set(
                ParagraphBorder::new(ParagraphBorderPosition::Left)
                    .val(BorderType::Single)
                    .size(border.size)
                    .space(border.space)
                    .color(border.color.clone()),
            ),
        );
    }

    para
}

fn build_run(styled: &StyledRun, shading: Option<&str>) -> Run {
    let mut run = Run::new().size(styled.size);

    if styled.bold {
        run = run.bold();
    }
    if styled.italic {
        run = run.italic();
    }
    if styled.underline {
        run = run.underline("single");
    }
    if styled.monospace {
        run = run.fonts(monospace_fonts());
    }
    if let Some(color) = &styled.color {
        run = run.color(color.clone());
    }
    if let Some(fill) = shading {
        run = run.shading(Shading::new().fill(fill));
    }

    for (i, line) in xml_safe(&styled.text).split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    run
}

/// Whether XML 1.0 allows `c` in character data.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

/// `text` without the control characters and noncharacters XML 1.0 forbids.
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Scale to `width_px` wide, keeping the aspect ratio.
///
/// Extents saturate at `u32::MAX` EMU for absurdly tall images.
fn build_pic(logo: &LogoImage, width_px: u32) -> Pic {
    let (width_emu, height_emu) = pic_extent(logo, width_px);
    Pic::new(&logo.bytes).size(width_emu, height_emu)
}

fn pic_extent(logo: &LogoImage, width_px: u32) -> (u32, u32) {
    let width = u64::from(width_px);
    let height = if logo.width_px == 0 {
        width
    } else {
        width * u64::from(logo.height_px) / u64::from(logo.width_px)
    };
    let emu = |px: u64| {
        u32::try_from(px.saturating_mul(u64::from(EMU_PER_PX))).unwrap_or(u32::MAX)
    };
    (emu(width), emu(height))
}
