//! Solution document: block model, markdown conversion, assembly and packing.
//!
//! ## Data Flow
//!
//! ```text
//! MarkdownNode[] ──▶ convert ──▶ DocumentBlock[] ──▶ assemble ──▶ writer ──▶ .docx bytes
//!                    (pure)                          (preamble)   (docx-rs)
//! ```
//!
//! 1. [`convert`]  — map each markdown node to styled blocks; never fails
//! 2. [`assemble`] — logo, title, student identity, page break, "Solution"
//!    header, then the converted blocks
//! 3. [`writer`]   — the only stage that touches docx-rs

pub mod assemble;
pub mod convert;
pub mod model;
pub mod styles;
pub mod writer;

pub use assemble::{assemble, build_solved_document, load_logo, solved_filename, title_from_filename};
pub use convert::{flatten_text, inline_runs, markdown_to_blocks, MAX_NESTING_DEPTH};
pub use model::{
    Alignment, BlockKind, Border, DocumentBlock, LogoImage, SolvedDocument, StudentIdentity,
    StyledRun,
};
