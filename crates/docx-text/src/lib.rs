//! # docx-text
//!
//! Pull the raw text out of a Word (`.docx`) file without any layout or
//! styling information.
//!
//! A `.docx` file is a zip container; the body lives in `word/document.xml`
//! as WordprocessingML. We open the container, parse that one part and walk
//! the element tree in document order:
//!
//! | Element   | Emitted           |
//! |-----------|-------------------|
//! | `w:t`     | its text          |
//! | `w:tab`   | `\t` (inside a run only; tab stops in `w:pPr` are ignored) |
//! | `w:br`, `w:cr` | `\n`         |
//! | `w:p`     | `\n\n` after the paragraph's content |
//!
//! Everything else (deleted text, field instructions, drawings) contributes
//! nothing. Table cells are ordinary paragraphs, so their text comes out one
//! cell per paragraph.
//!
//! ## Usage
//!
//! ```rust,no_run
//! let bytes = std::fs::read("assignment.docx").unwrap();
//! let text = docx_text::extract_raw_text(&bytes).unwrap();
//! println!("{text}");
//! ```

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// WordprocessingML main namespace.
pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Path of the main document part inside the container.
pub const DOCUMENT_PART: &str = "word/document.xml";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by docx-text operations.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The bytes are not a zip container at all.
    #[error("Not a Word document (zip container unreadable): {0}")]
    NotAZip(String),

    /// The container opened but has no `word/document.xml`.
    #[error("Word document has no 'word/document.xml' part")]
    MissingDocumentPart,

    /// `word/document.xml` is not well-formed XML.
    #[error("Malformed document XML: {0}")]
    InvalidXml(String),

    /// Reading a part (or the file on disk) failed.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Extract the raw text of a `.docx` held in memory.
///
/// Either the whole text comes back or an error does; there is no partial
/// output on a corrupt part.
pub fn extract_raw_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let xml = read_document_part(bytes)?;
    raw_text_from_xml(&xml)
}

/// Read a `.docx` file from disk and extract its raw text.
pub fn extract_raw_text_from_path(path: impl AsRef<Path>) -> Result<String, ExtractError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_raw_text(&bytes)
}

/// Extract raw text from an already-unzipped `word/document.xml` string.
pub fn raw_text_from_xml(xml: &str) -> Result<String, ExtractError> {
    let doc = Document::parse(xml).map_err(|e| ExtractError::InvalidXml(e.to_string()))?;
    let mut out = String::new();
    walk(doc.root_element(), &mut out);
    Ok(out)
}

// ── Internal ─────────────────────────────────────────────────────────────────

fn read_document_part(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::NotAZip(e.to_string()))?;

    let mut part = match archive.by_name(DOCUMENT_PART) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Err(ExtractError::MissingDocumentPart),
        Err(e) => return Err(ExtractError::NotAZip(e.to_string())),
    };

    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|source| ExtractError::Io {
        path: PathBuf::from(DOCUMENT_PART),
        source,
    })?;
    Ok(xml)
}

fn is_wordml(node: &Node<'_, '_>, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(WORDML_NS)
}

fn parent_is_run(node: &Node<'_, '_>) -> bool {
    node.parent().is_some_and(|p| is_wordml(&p, "r"))
}

fn walk(node: Node<'_, '_>, out: &mut String) {
    if is_wordml(&node, "t") {
        if let Some(text) = node.text() {
            out.push_str(text);
        }
        return;
    }
    if is_wordml(&node, "tab") {
        if parent_is_run(&node) {
            out.push('\t');
        }
        return;
    }
    if is_wordml(&node, "br") || is_wordml(&node, "cr") {
        out.push('\n');
        return;
    }

    for child in node.children().filter(|c| c.is_element()) {
        walk(child, out);
    }

    if is_wordml(&node, "p") {
        out.push_str("\n\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{WORDML_NS}"><w:body>{inner}</w:body></w:document>"#
        )
    }

    fn docx_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let xml = body(
            "<w:p><w:r><w:t>Question 1</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Explain </w:t></w:r><w:r><w:t>ownership.</w:t></w:r></w:p>",
        );
        let text = raw_text_from_xml(&xml).unwrap();
        assert_eq!(text, "Question 1\n\nExplain ownership.\n\n");
    }

    #[test]
    fn tabs_and_breaks_inside_runs() {
        let xml = body("<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>");
        assert_eq!(raw_text_from_xml(&xml).unwrap(), "a\tb\nc\n\n");
    }

    #[test]
    fn tab_stop_definitions_are_ignored() {
        let xml = body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        assert_eq!(raw_text_from_xml(&xml).unwrap(), "x\n\n");
    }

    #[test]
    fn deleted_text_is_skipped() {
        let xml = body("<w:p><w:del><w:r><w:delText>gone</w:delText></w:r></w:del><w:r><w:t>kept</w:t></w:r></w:p>");
        assert_eq!(raw_text_from_xml(&xml).unwrap(), "kept\n\n");
    }

    #[test]
    fn extracts_from_zip_container() {
        let bytes = docx_with(&[
            ("[Content_Types].xml", "<Types/>"),
            (DOCUMENT_PART, &body("<w:p><w:r><w:t>Hello</w:t></w:r></w:p>")),
        ]);
        assert_eq!(extract_raw_text(&bytes).unwrap(), "Hello\n\n");
    }

    #[test]
    fn garbage_bytes_are_not_a_zip() {
        let err = extract_raw_text(b"definitely not a docx").unwrap_err();
        assert!(matches!(err, ExtractError::NotAZip(_)), "got: {err:?}");
    }

    #[test]
    fn missing_document_part() {
        let bytes = docx_with(&[("word/styles.xml", "<w:styles/>")]);
        let err = extract_raw_text(&bytes).unwrap_err();
        assert!(matches!(err, ExtractError::MissingDocumentPart));
    }

    #[test]
    fn malformed_xml() {
        let bytes = docx_with(&[(DOCUMENT_PART, "<w:document><w:body>")]);
        let err = extract_raw_text(&bytes).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidXml(_)));
    }

    #[test]
    fn missing_file_on_disk() {
        let err = extract_raw_text_from_path("/definitely/not/here.docx").unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
        assert!(err.to_string().contains("here.docx"));
    }

    #[test]
    fn reads_file_from_disk() {
        let bytes = docx_with(&[(DOCUMENT_PART, &body("<w:p><w:r><w:t>disk</w:t></w:r></w:p>"))]);
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&bytes).unwrap();
        assert_eq!(extract_raw_text_from_path(tmp.path()).unwrap(), "disk\n\n");
    }
}
