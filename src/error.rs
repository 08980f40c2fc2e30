//! Error types for the gcr-solve library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SolveError`] — **Fatal**: the solve request cannot produce a document
//!   (unreadable upload, provider not configured, packing failed). Returned
//!   as `Err(SolveError)` from the top-level `solve*` functions.
//!
//! * [`AssetWarning`] — **Non-fatal**: the logo could not be loaded. The
//!   document is still produced, just without the image; the warning is
//!   logged and never returned.
//!
//! A markdown node the converter does not recognise is neither: it degrades
//! to plain text or is skipped.

use std::path::PathBuf;
use thiserror::Error;

pub use docx_text::ExtractError;

/// All fatal errors returned by the gcr-solve library.
#[derive(Debug, Error)]
pub enum SolveError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Assignment file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but does not start with the zip signature every
    /// `.docx` carries.
    #[error("File is not a Word document: '{path}'\nFirst bytes: {magic:?}")]
    NotADocx { path: PathBuf, magic: [u8; 4] },

    /// The upload could not be read as a Word document.
    #[error("Text extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error (after any configured retries).
    #[error("LLM API error after {attempts} attempt(s): {message}")]
    LlmApiError { attempts: u32, message: String },

    /// The LLM call did not finish within `api_timeout_secs`.
    #[error("LLM call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    /// The model answered with nothing but whitespace.
    #[error("The model returned an empty solution for '{filename}'")]
    EmptySolution { filename: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The solution text could not be parsed as markdown.
    #[error("Markdown parse error: {0}")]
    MarkdownParse(String),

    /// docx-rs failed to pack the assembled document.
    #[error("Failed to serialise solution document: {0}")]
    Serialization(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal problem with a document asset.
#[derive(Debug, Error)]
pub enum AssetWarning {
    /// The logo file is missing or unreadable.
    #[error("logo '{path}' could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The logo file was read but is not a PNG or JPEG image.
    #[error("logo '{path}' is not a supported image: {detail}")]
    Unsupported { path: PathBuf, detail: String },
}
