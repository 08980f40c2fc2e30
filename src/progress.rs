//! Progress-callback trait for per-stage solve events.
//!
//! Inject an [`Arc<dyn SolveProgressCallback>`] via
//! [`crate::config::SolveConfigBuilder::progress_callback`] to follow a
//! request through extraction, generation, assembly and writing.
//!
//! # Example
//!
//! ```rust
//! use gcr_solve::{SolveConfig, SolveProgressCallback, SolveStage};
//! use std::sync::Arc;
//!
//! struct Log;
//!
//! impl SolveProgressCallback for Log {
//!     fn on_stage_complete(&self, stage: SolveStage, elapsed_ms: u64) {
//!         eprintln!("{stage} done in {elapsed_ms}ms");
//!     }
//! }
//!
//! let config = SolveConfig::builder()
//!     .progress_callback(Arc::new(Log))
//!     .build()
//!     .unwrap();
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Pipeline stage reported to a [`SolveProgressCallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStage {
    /// Reading the upload and pulling its text out.
    Extract,
    /// Waiting on the model.
    Generate,
    /// Converting markdown and packing the `.docx`.
    Assemble,
    /// Writing the output file (only for [`crate::solve_to_dir`]).
    Write,
}

impl SolveStage {
    pub fn label(self) -> &'static str {
        match self {
            SolveStage::Extract => "Extracting text",
            SolveStage::Generate => "Generating solution",
            SolveStage::Assemble => "Assembling document",
            SolveStage::Write => "Writing output",
        }
    }
}

impl fmt::Display for SolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Called by the solve pipeline as it moves between stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; the callback
/// is shared through the config across tasks.
pub trait SolveProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, stage: SolveStage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    fn on_stage_complete(&self, stage: SolveStage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called once the output document exists.
    ///
    /// # Arguments
    /// * `filename` — `solved_<original>`
    /// * `bytes`    — size of the packed `.docx`
    fn on_solve_complete(&self, filename: &str, bytes: usize) {
        let _ = (filename, bytes);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SolveProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SolveConfig`].
pub type ProgressCallback = Arc<dyn SolveProgressCallback>;
