//! Pipeline stages for solving an assignment.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested without the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm ──▶ postprocess ──▶ document::assemble
//! (.docx)   (text)     (LLM)   (cleanup)       (.docx)
//! ```
//!
//! 1. [`input`]   — read the upload and check its zip signature
//! 2. [`extract`] — raw text of `word/document.xml`, on the blocking pool
//! 3. [`llm`]     — the solve call with optional retry and timeout; the only
//!    stage with network I/O
//! 4. [`postprocess`] — deterministic cleanup of the returned markdown

pub mod extract;
pub mod input;
pub mod llm;
pub mod postprocess;
