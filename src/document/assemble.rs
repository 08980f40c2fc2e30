//! Solution document assembly: cover preamble + converted solution blocks.
//!
//! ```text
//! [logo]            centered, optional
//! <title>           text before the first '.' of the upload's filename
//! Name: <name>
//! Roll No: <roll>
//! ── page break ──
//! Solution
//! <blocks converted from the model's markdown>
//! ```

use crate::document::convert::markdown_to_blocks;
use crate::document::model::{DocumentBlock, LogoImage, SolvedDocument, StudentIdentity, StyledRun};
use crate::document::styles::{ACCENT_COLOR, LOGO_WIDTH_PX, SECTION_HEADER_SIZE, TITLE_SIZE};
use crate::document::writer::write_docx;
use crate::error::{AssetWarning, SolveError};
use crate::markdown::parse_markdown;
use std::path::Path;
use tracing::{debug, warn};

/// Header printed above the converted solution.
pub const SOLUTION_HEADER: &str = "Solution";

/// Filename the output document is stored under.
pub fn solved_filename(original: &str) -> String {
    format!("solved_{original}")
}

/// Everything before the first `.` of the filename.
pub fn title_from_filename(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// Load the logo, or log why not and return `None`.
///
/// A missing logo never aborts document generation.
pub fn load_logo(path: &Path) -> Option<LogoImage> {
    match read_logo(path) {
        Ok(logo) => {
            debug!(
                "Loaded logo {} ({}x{})",
                path.display(),
                logo.width_px,
                logo.height_px
            );
            Some(logo)
        }
        Err(w) => {
            warn!("{w}; continuing without logo");
            None
        }
    }
}

fn read_logo(path: &Path) -> Result<LogoImage, AssetWarning> {
    let bytes = std::fs::read(path).map_err(|source| AssetWarning::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let unsupported = |detail: String| AssetWarning::Unsupported {
        path: path.to_path_buf(),
        detail,
    };

    match image::guess_format(&bytes) {
        Ok(image::ImageFormat::Png | image::ImageFormat::Jpeg) => {}
        Ok(other) => return Err(unsupported(format!("{other:?}"))),
        Err(e) => return Err(unsupported(e.to_string())),
    }
    let decoded = image::load_from_memory(&bytes).map_err(|e| unsupported(e.to_string()))?;

    Ok(LogoImage {
        width_px: decoded.width(),
        height_px: decoded.height(),
        bytes,
    })
}

/// Build the document structure for one solve request.
pub fn build_solved_document(
    filename: &str,
    blocks: Vec<DocumentBlock>,
    student: &StudentIdentity,
    logo: Option<LogoImage>,
) -> SolvedDocument {
    SolvedDocument {
        logo,
        title: title_from_filename(filename).to_string(),
        student: student.clone(),
        blocks,
    }
}

impl SolvedDocument {
    /// The complete block sequence, preamble first.
    pub fn to_blocks(&self) -> Vec<DocumentBlock> {
        let mut out = Vec::with_capacity(self.blocks.len() + 6);

        if let Some(logo) = &self.logo {
            out.push(DocumentBlock::image(logo.clone(), LOGO_WIDTH_PX));
        }
        out.push(
            DocumentBlock::new(vec![StyledRun::plain(&self.title)
                .bold()
                .size(TITLE_SIZE)
                .color(ACCENT_COLOR)])
            .centered(),
        );
        out.push(
            DocumentBlock::new(vec![StyledRun::plain(format!("Name: {}", self.student.name))])
                .centered(),
        );
        out.push(
            DocumentBlock::new(vec![StyledRun::plain(format!(
                "Roll No: {}",
                self.student.roll_number
            ))])
            .centered(),
        );
        out.push(DocumentBlock::page_break());
        out.push(DocumentBlock::new(vec![StyledRun::plain(SOLUTION_HEADER)
            .bold()
            .size(SECTION_HEADER_SIZE)
            .color(ACCENT_COLOR)]));

        out.extend(self.blocks.iter().cloned());
        out
    }

    /// Serialise to `.docx` bytes.
    pub fn to_docx(&self) -> Result<Vec<u8>, SolveError> {
        write_docx(&self.to_blocks())
    }
}

/// Produce the final `.docx` for one solved assignment.
///
/// `logo_path` is optional; an unreadable logo is logged and skipped.
pub fn assemble(
    filename: &str,
    solution_markdown: &str,
    student: &StudentIdentity,
    logo_path: Option<&Path>,
) -> Result<Vec<u8>, SolveError> {
    let logo = logo_path.and_then(load_logo);
    let nodes = parse_markdown(solution_markdown)?;
    let blocks = markdown_to_blocks(&nodes);
    debug!("{} markdown nodes → {} blocks", nodes.len(), blocks.len());

    build_solved_document(filename, blocks, student, logo).to_docx()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::BlockKind;
    use std::io::Write;

    // 1x1 transparent PNG.
    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x60,
        0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0xE9, 0xFA, 0xDC, 0xD8, 0x00, 0x00, 0x00, 0x00,
        0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn student() -> StudentIdentity {
        StudentIdentity::new("Ada Lovelace", "CS-042")
    }

    #[test]
    fn title_is_text_before_first_dot() {
        assert_eq!(title_from_filename("Assignment 3.final.docx"), "Assignment 3");
        assert_eq!(title_from_filename("lab"), "lab");
        assert_eq!(title_from_filename(".docx"), "");
    }

    #[test]
    fn solved_filename_prefix() {
        assert_eq!(solved_filename("hw1.docx"), "solved_hw1.docx");
    }

    #[test]
    fn preamble_order_without_logo() {
        let doc = build_solved_document("hw1.docx", vec![], &student(), None);
        let blocks = doc.to_blocks();
        let texts: Vec<String> = blocks.iter().map(|b| b.text()).collect();
        assert_eq!(
            texts,
            vec!["hw1", "Name: Ada Lovelace", "Roll No: CS-042", "", SOLUTION_HEADER]
        );
        assert_eq!(blocks[3].kind, BlockKind::PageBreak);
        assert!(blocks[0].runs()[0].bold);
    }

    #[test]
    fn logo_comes_first_when_present() {
        let logo = LogoImage {
            bytes: PNG_1X1.to_vec(),
            width_px: 1,
            height_px: 1,
        };
        let doc = build_solved_document("hw1.docx", vec![], &student(), Some(logo));
        let blocks = doc.to_blocks();
        assert!(matches!(blocks[0].kind, BlockKind::Image { .. }));
        assert_eq!(blocks.len(), 6);
    }

    #[test]
    fn empty_identity_is_passed_through() {
        let doc = build_solved_document("x.docx", vec![], &StudentIdentity::default(), None);
        let texts: Vec<String> = doc.to_blocks().iter().map(|b| b.text()).collect();
        assert_eq!(texts[1], "Name: ");
        assert_eq!(texts[2], "Roll No: ");
    }

    #[test]
    fn missing_logo_still_produces_document() {
        let bytes = assemble(
            "hw1.docx",
            "# Answer\n\nDone.",
            &student(),
            Some(Path::new("/definitely/not/a/logo.png")),
        )
        .unwrap();
        assert!(!bytes.is_empty());
        let text = docx_text::extract_raw_text(&bytes).unwrap();
        for expected in ["hw1", "Name: Ada Lovelace", "Roll No: CS-042", "Solution", "Answer", "Done."] {
            assert!(text.contains(expected), "missing {expected:?} in {text:?}");
        }
    }

    #[test]
    fn load_logo_rejects_non_images() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"not an image at all").unwrap();
        assert!(load_logo(tmp.path()).is_none());
    }

    #[test]
    fn load_logo_reads_png_dimensions() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(PNG_1X1).unwrap();
        let logo = load_logo(tmp.path()).expect("png should load");
        assert_eq!((logo.width_px, logo.height_px), (1, 1));
    }

    #[test]
    fn logo_is_embedded_in_output() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(PNG_1X1).unwrap();
        let bytes = assemble("hw1.docx", "text", &student(), Some(tmp.path())).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(&bytes)).unwrap();
        let mut xml = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("word/document.xml").unwrap(), &mut xml)
            .unwrap();
        assert!(xml.contains("w:drawing"), "expected an embedded picture");
    }
}
