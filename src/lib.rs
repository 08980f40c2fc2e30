//! # gcr-solve
//!
//! Solve a classroom assignment (`.docx`) with a generative model and package
//! the answer as a formatted Word document.
//!
//! ## Why markdown in the middle?
//!
//! Models are good at writing markdown and bad at writing WordprocessingML.
//! The model answers in markdown; this crate parses it and maps each element
//! to styled Word paragraphs itself, so the output formatting is fixed by the
//! crate rather than left to the model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! assignment.docx
//!  │
//!  ├─ 1. Extract   raw text of word/document.xml (docx-text)
//!  ├─ 2. Prompt    fixed solver template + extracted text
//!  ├─ 3. LLM       one completion call (Gemini by default)
//!  ├─ 4. Polish    deterministic markdown cleanup
//!  ├─ 5. Convert   markdown → styled DocumentBlocks
//!  └─ 6. Assemble  logo, title, student, page break, "Solution", blocks → .docx
//! ```
//!
//! The result is named `solved_<original filename>`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gcr_solve::{solve, SolveConfig, StudentIdentity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected; GEMINI_API_KEY selects gemini-2.0-flash.
//!     let config = SolveConfig::default();
//!     let student = StudentIdentity::new("Ada Lovelace", "CS-042");
//!     let output = solve("assignment.docx", &student, &config).await?;
//!     std::fs::write(&output.filename, &output.document)?;
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.input_tokens,
//!         output.stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! Already have the markdown? [`render_markdown`] runs only the assembly:
//!
//! ```rust
//! use gcr_solve::{render_markdown, SolveConfig, StudentIdentity};
//!
//! let config = SolveConfig::builder().no_logo().build().unwrap();
//! let student = StudentIdentity::new("Ada Lovelace", "CS-042");
//! let out = render_markdown("hw1.docx", "## Q1\n\n**42**", &student, &config).unwrap();
//! assert_eq!(out.filename, "solved_hw1.docx");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gcr-solve` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod markdown;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod solve;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use crate::markdown::{parse_markdown, MarkdownNode};
pub use config::{SolveConfig, SolveConfigBuilder};
pub use document::{
    assemble, markdown_to_blocks, DocumentBlock, SolvedDocument, StudentIdentity, StyledRun,
};
pub use error::{AssetWarning, ExtractError, SolveError};
pub use output::{SolveOutput, SolveStats};
pub use progress::{NoopProgressCallback, ProgressCallback, SolveProgressCallback, SolveStage};
pub use solve::{
    extract_text, render_markdown, solve, solve_bytes, solve_sync, solve_to_dir, write_document,
};
