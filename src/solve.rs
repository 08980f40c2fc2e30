//! Solve entry points: uploaded assignment in, solution document out.
//!
//! [`solve`] and [`solve_bytes`] return the packed document in memory;
//! [`solve_to_dir`] also writes it next to other solutions.
//! [`render_markdown`] skips extraction and the model for callers that
//! already hold a markdown solution.

use crate::config::{SolveConfig, DEFAULT_GEMINI_MODEL};
use crate::document::{assemble, solved_filename, StudentIdentity};
use crate::error::SolveError;
use crate::output::{SolveOutput, SolveStats};
use crate::pipeline::{extract, input, llm, postprocess};
use crate::progress::SolveStage;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Solve a `.docx` assignment on disk.
///
/// # Errors
/// - File not found / permission denied / not a `.docx`
/// - Text extraction failed
/// - Provider not configured, API error or timeout, empty answer
/// - Document packing failed
pub async fn solve(
    input_path: impl AsRef<Path>,
    student: &StudentIdentity,
    config: &SolveConfig,
) -> Result<SolveOutput, SolveError> {
    let total_start = Instant::now();
    let path = input_path.as_ref();
    info!("Starting solve: {}", path.display());

    // ── Step 1: Read upload ──────────────────────────────────────────────
    stage_start(config, SolveStage::Extract);
    let extract_start = Instant::now();
    let file = input::read_assignment(path).await?;

    // ── Step 2: Get/create provider ──────────────────────────────────────
    // Resolved before extraction so a missing API key fails fast.
    let provider = resolve_provider(config)?;

    run(file.filename, file.bytes, student, config, provider, total_start, extract_start).await
}

/// Solve an assignment held in memory (the upload case).
///
/// `filename` is the name the document was submitted under; it only feeds
/// the title and the output name. Any directory part is discarded.
pub async fn solve_bytes(
    filename: &str,
    bytes: Vec<u8>,
    student: &StudentIdentity,
    config: &SolveConfig,
) -> Result<SolveOutput, SolveError> {
    let total_start = Instant::now();
    let filename = input::upload_filename(filename);
    info!("Starting solve: {} ({} bytes in memory)", filename, bytes.len());

    stage_start(config, SolveStage::Extract);
    let extract_start = Instant::now();
    input::check_magic(&input::upload_path(&filename), &bytes)?;

    let provider = resolve_provider(config)?;

    run(filename, bytes, student, config, provider, total_start, extract_start).await
}

/// Solve an assignment and write `out_dir/solved_<filename>`.
///
/// Uses atomic write (temp file + rename) so a failed run never leaves a
/// truncated document behind.
pub async fn solve_to_dir(
    input_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    student: &StudentIdentity,
    config: &SolveConfig,
) -> Result<(PathBuf, SolveStats), SolveError> {
    let output = solve(input_path, student, config).await?;
    let path = write_document(out_dir, &output, config).await?;
    Ok((path, output.stats))
}

/// Build the solution document from markdown that is already written.
///
/// No extraction and no LLM call; only the assembly stage runs.
pub fn render_markdown(
    filename: &str,
    markdown: &str,
    student: &StudentIdentity,
    config: &SolveConfig,
) -> Result<SolveOutput, SolveError> {
    let total_start = Instant::now();
    let filename = input::upload_filename(filename);
    let markdown = postprocess::clean_solution(markdown);

    stage_start(config, SolveStage::Assemble);
    let assemble_start = Instant::now();
    let document = assemble(&filename, &markdown, student, config.logo_path.as_deref())?;
    let assemble_duration_ms = stage_done(config, SolveStage::Assemble, assemble_start);

    let output = SolveOutput {
        filename: solved_filename(&filename),
        stats: SolveStats {
            assemble_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            document_bytes: document.len(),
            ..Default::default()
        },
        document,
        markdown,
    };
    finish(config, &output);
    Ok(output)
}

/// Write a solved document into `out_dir` under its `solved_` name.
///
/// The file always lands directly inside `out_dir`, whatever
/// `output.filename` contains.
pub async fn write_document(
    out_dir: impl AsRef<Path>,
    output: &SolveOutput,
    config: &SolveConfig,
) -> Result<PathBuf, SolveError> {
    let path = out_dir
        .as_ref()
        .join(input::upload_filename(&output.filename));
    let write_err = |source| SolveError::OutputWriteFailed {
        path: path.clone(),
        source,
    };

    stage_start(config, SolveStage::Write);
    let write_start = Instant::now();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("docx.tmp");
    tokio::fs::write(&tmp_path, &output.document)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(write_err)?;

    stage_done(config, SolveStage::Write, write_start);
    info!("Wrote {} ({} bytes)", path.display(), output.document.len());
    Ok(path)
}

/// Synchronous wrapper around [`solve`].
///
/// Creates a temporary tokio runtime internally.
pub fn solve_sync(
    input_path: impl AsRef<Path>,
    student: &StudentIdentity,
    config: &SolveConfig,
) -> Result<SolveOutput, SolveError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SolveError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(solve(input_path, student, config))
}

/// Extract the assignment text only.
///
/// Does not require an LLM provider or API key.
pub async fn extract_text(input_path: impl AsRef<Path>) -> Result<String, SolveError> {
    let file = input::read_assignment(input_path.as_ref()).await?;
    extract::extract_text(&file.filename, file.bytes).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Extract, generate and assemble. The Extract stage has already started.
async fn run(
    filename: String,
    bytes: Vec<u8>,
    student: &StudentIdentity,
    config: &SolveConfig,
    provider: Arc<dyn LLMProvider>,
    total_start: Instant,
    extract_start: Instant,
) -> Result<SolveOutput, SolveError> {
    // ── Extract ──────────────────────────────────────────────────────────
    let text = extract::extract_text(&filename, bytes).await?;
    let extract_duration_ms = stage_done(config, SolveStage::Extract, extract_start);

    // ── Generate ─────────────────────────────────────────────────────────
    stage_start(config, SolveStage::Generate);
    let llm_start = Instant::now();
    let generation = llm::generate_solution(&provider, &filename, &text, config).await?;
    let markdown = postprocess::clean_solution(&generation.markdown);
    if markdown.trim().is_empty() {
        return Err(SolveError::EmptySolution { filename });
    }
    let llm_duration_ms = stage_done(config, SolveStage::Generate, llm_start);

    // ── Assemble ─────────────────────────────────────────────────────────
    stage_start(config, SolveStage::Assemble);
    let assemble_start = Instant::now();
    let document = {
        let filename = filename.clone();
        let markdown = markdown.clone();
        let student = student.clone();
        let logo_path = config.logo_path.clone();
        tokio::task::spawn_blocking(move || {
            assemble(&filename, &markdown, &student, logo_path.as_deref())
        })
        .await
        .map_err(|e| SolveError::Internal(format!("Assembly task panicked: {e}")))??
    };
    let assemble_duration_ms = stage_done(config, SolveStage::Assemble, assemble_start);

    let stats = SolveStats {
        assignment_chars: text.chars().count(),
        input_tokens: generation.input_tokens,
        output_tokens: generation.output_tokens,
        attempts: generation.attempts,
        extract_duration_ms,
        llm_duration_ms,
        assemble_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        document_bytes: document.len(),
    };

    info!(
        "Solve complete: {} → {} bytes, {}ms total",
        filename, stats.document_bytes, stats.total_duration_ms
    );

    let output = SolveOutput {
        filename: solved_filename(&filename),
        document,
        markdown,
        stats,
    };
    finish(config, &output);
    Ok(output)
}

fn stage_start(config: &SolveConfig, stage: SolveStage) {
    debug!("{stage}…");
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
}

/// Report a finished stage and return its duration in milliseconds.
fn stage_done(config: &SolveConfig, stage: SolveStage, start: Instant) -> u64 {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    debug!("{stage} took {elapsed_ms}ms");
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(stage, elapsed_ms);
    }
    elapsed_ms
}

fn finish(config: &SolveConfig, output: &SolveOutput) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_solve_complete(&output.filename, output.document.len());
    }
}

/// Model used for a named provider when the config does not name one.
fn default_model(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "gemini" => Some(DEFAULT_GEMINI_MODEL),
        "openai" => Some("gpt-4.1-nano"),
        _ => None,
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, SolveError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        SolveError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider + model** (`config.provider_name`). The factory reads
///    the matching API key from the environment.
/// 3. **Environment pair** (`GCR_SOLVE_PROVIDER` + `GCR_SOLVE_MODEL`), when
///    both are set and non-empty.
/// 4. **Gemini** when `GEMINI_API_KEY` is set, with the configured model or
///    `gemini-2.0-flash`.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
fn resolve_provider(config: &SolveConfig) -> Result<Arc<dyn LLMProvider>, SolveError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = match config.model.as_deref().or_else(|| default_model(name)) {
            Some(model) => model,
            None => {
                return Err(SolveError::ProviderNotConfigured {
                    provider: name.clone(),
                    hint: format!("No default model for '{name}'; pass a model explicitly."),
                })
            }
        };
        return create_provider(name, model);
    }

    // 3) GCR_SOLVE_PROVIDER + GCR_SOLVE_MODEL when both set
    if let (Ok(prov), Ok(model)) = (
        std::env::var("GCR_SOLVE_PROVIDER"),
        std::env::var("GCR_SOLVE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    // 4) Gemini is the solver's home provider
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
            return create_provider("gemini", model);
        }
    }

    // 5) Whatever the environment offers
    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| SolveError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
