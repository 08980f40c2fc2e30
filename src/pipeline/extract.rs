//! Text extraction: pull the assignment's raw text out of the `.docx`.
//!
//! Unzipping and XML parsing are CPU-bound, so the work runs on tokio's
//! blocking pool and the async workers stay free while a large upload is
//! being read.

use crate::error::SolveError;
use tracing::{debug, info};

/// Extract raw text from `.docx` bytes on the blocking pool.
pub async fn extract_text(filename: &str, bytes: Vec<u8>) -> Result<String, SolveError> {
    let text = tokio::task::spawn_blocking(move || docx_text::extract_raw_text(&bytes))
        .await
        .map_err(|e| SolveError::Internal(format!("Extraction task panicked: {e}")))??;

    info!("Extracted {} chars from {}", text.chars().count(), filename);
    if text.trim().is_empty() {
        debug!("{filename} contains no text; the prompt will carry an empty assignment");
    }
    Ok(text)
}
