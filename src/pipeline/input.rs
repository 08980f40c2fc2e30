//! Input resolution: read an uploaded assignment from disk.
//!
//! We validate the zip signature (`PK\x03\x04`) before any further work so
//! callers get a meaningful error rather than a zip-parser message when they
//! hand over a `.doc`, a PDF or a renamed text file.

use crate::error::SolveError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Leading bytes of every zip container, and so of every `.docx`.
pub const DOCX_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// An upload read into memory, with the name it was submitted under.
#[derive(Debug, Clone)]
pub struct AssignmentFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Read a local `.docx`, validating existence, permissions and magic bytes.
pub async fn read_assignment(path: &Path) -> Result<AssignmentFile, SolveError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => SolveError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => SolveError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    check_magic(path, &bytes)?;

    let filename = filename_of(path);
    debug!("Read assignment {} ({} bytes)", path.display(), bytes.len());
    Ok(AssignmentFile { filename, bytes })
}

/// Reject buffers that cannot be a `.docx`.
///
/// Buffers shorter than four bytes are padded with zeros in the reported magic.
pub fn check_magic(path: &Path, bytes: &[u8]) -> Result<(), SolveError> {
    if bytes.starts_with(&DOCX_MAGIC) {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    Err(SolveError::NotADocx {
        path: path.to_path_buf(),
        magic,
    })
}

/// Final path component, or `assignment.docx` for paths without one.
pub fn filename_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "assignment.docx".to_string())
}

/// Reduce a client-supplied upload name to a bare file name.
///
/// Both `/` and `\\` count as separators whatever the host, and `.`/`..`
/// never survive, so the result is always safe to join onto an output
/// directory.
pub fn upload_filename(name: &str) -> String {
    match name.rsplit(['/', '\\']).next().map(str::trim) {
        Some(last) if !last.is_empty() && last != "." && last != ".." => last.to_string(),
        _ => "assignment.docx".to_string(),
    }
}

/// Path an in-memory upload is reported under in errors.
pub fn upload_path(filename: &str) -> PathBuf {
    PathBuf::from(filename)
}
