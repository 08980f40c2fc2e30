//! Result types returned by the solve entry points.

use serde::Serialize;

/// A solved assignment: the packed document plus what went into it.
#[derive(Clone, Serialize)]
pub struct SolveOutput {
    /// `solved_<original filename>`.
    pub filename: String,
    /// The packed `.docx`.
    #[serde(skip)]
    pub document: Vec<u8>,
    /// Cleaned markdown the document was built from.
    pub markdown: String,
    pub stats: SolveStats,
}

impl std::fmt::Debug for SolveOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveOutput")
            .field("filename", &self.filename)
            .field("document", &format_args!("<{} bytes>", self.document.len()))
            .field("markdown_len", &self.markdown.len())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Token usage and per-stage timings for one request.
///
/// Stages that did not run (e.g. generation in [`crate::render_markdown`])
/// report zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    /// Characters of assignment text sent to the model.
    pub assignment_chars: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// LLM calls made, retries included.
    pub attempts: u32,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub assemble_duration_ms: u64,
    pub total_duration_ms: u64,
    pub document_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialise_to_json() {
        let stats = SolveStats {
            input_tokens: 120,
            output_tokens: 800,
            attempts: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["input_tokens"], 120);
        assert_eq!(json["output_tokens"], 800);
        assert_eq!(json["llm_duration_ms"], 0);
    }

    #[test]
    fn output_json_skips_document_bytes() {
        let out = SolveOutput {
            filename: "solved_a.docx".into(),
            document: vec![1, 2, 3],
            markdown: "# A\n".into(),
            stats: SolveStats::default(),
        };
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("document").is_none());
        assert_eq!(json["filename"], "solved_a.docx");
        assert!(format!("{out:?}").contains("<3 bytes>"));
    }
}
