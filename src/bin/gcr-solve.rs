//! CLI binary for gcr-solve.
//!
//! A thin shim over the library crate that maps CLI flags to `SolveConfig`,
//! writes the solved document and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use gcr_solve::pipeline::input::filename_of;
use gcr_solve::{
    extract_text, render_markdown, solve, write_document, ProgressCallback, SolveConfig,
    SolveOutput, SolveProgressCallback, SolveStage, StudentIdentity,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one spinner whose message follows the
/// current stage, plus a log line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Solving");
        bar.set_message("Opening assignment…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl SolveProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: SolveStage) {
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: SolveStage, elapsed_ms: u64) {
        let line = format!(
            "  {} {:<22} {}",
            green("✓"),
            stage.label(),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        );
        // The Write stage runs after the spinner has been cleared.
        if self.bar.is_finished() {
            eprintln!("{line}");
        } else {
            self.bar.println(line);
        }
    }

    fn on_solve_complete(&self, filename: &str, bytes: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} {}",
            green("✔"),
            bold(filename),
            dim(&format!("({bytes} bytes)"))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Solve an assignment into ./solved_assignment.docx
  gcr-solve assignment.docx --name "Ada Lovelace" --roll CS-042

  # Write into another directory
  gcr-solve assignment.docx --name "Ada Lovelace" --roll CS-042 -o out/

  # Use a specific model
  gcr-solve --provider gemini --model gemini-2.5-pro assignment.docx

  # Only print the extracted assignment text (no API key needed)
  gcr-solve --extract-only assignment.docx

  # Build the document from a markdown answer you already have
  gcr-solve assignment.docx --markdown answer.md --name "Ada Lovelace" --roll CS-042

  # JSON stats on stdout
  gcr-solve --json assignment.docx > stats.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        Google Gemini API key (selects gemini-2.0-flash)
  GCR_SOLVE_PROVIDER    Override provider (gemini, openai, anthropic, ollama)
  GCR_SOLVE_MODEL       Override model ID
  OPENAI_API_KEY        OpenAI API key (auto-detected when Gemini is absent)
  ANTHROPIC_API_KEY     Anthropic API key (auto-detected when Gemini is absent)
  RUST_LOG              Log filter, e.g. gcr_solve=debug
"#;

/// Solve Word assignments with a generative model.
#[derive(Parser, Debug)]
#[command(
    name = "gcr-solve",
    version,
    about = "Solve Word assignments with a generative model",
    long_about = "Extract the text of a .docx assignment, ask a generative model (Gemini by \
default) for a solution and package the answer as a formatted Word document named \
solved_<filename>, with a cover page carrying the student's name and roll number.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the assignment (.docx).
    input: PathBuf,

    /// Student name printed on the cover page.
    #[arg(long, env = "GCR_SOLVE_NAME", default_value = "")]
    name: String,

    /// Roll number printed on the cover page.
    #[arg(long, env = "GCR_SOLVE_ROLL", default_value = "")]
    roll: String,

    /// Directory the solved document is written to.
    #[arg(short, long, env = "GCR_SOLVE_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// LLM model ID (e.g. gemini-2.0-flash, gpt-4.1-mini).
    #[arg(long, env = "GCR_SOLVE_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama.
    #[arg(
        long,
        env = "GCR_SOLVE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set;\n\
          GEMINI_API_KEY wins when present."
    )]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "GCR_SOLVE_TEMPERATURE", default_value_t = 0.4)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "GCR_SOLVE_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Retries on LLM failure (0 = a single call).
    #[arg(long, env = "GCR_SOLVE_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// LLM call timeout in seconds.
    #[arg(long, env = "GCR_SOLVE_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "GCR_SOLVE_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Cover-page logo (PNG or JPEG).
    #[arg(long, env = "GCR_SOLVE_LOGO", default_value = gcr_solve::config::DEFAULT_LOGO_PATH)]
    logo: PathBuf,

    /// Build the document from this markdown file instead of calling the model.
    #[arg(long, conflicts_with = "extract_only")]
    markdown: Option<PathBuf>,

    /// Print the extracted assignment text and exit.
    #[arg(long)]
    extract_only: bool,

    /// Print SolveOutput (stats and markdown) as JSON on stdout.
    #[arg(long, env = "GCR_SOLVE_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GCR_SOLVE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "GCR_SOLVE_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "GCR_SOLVE_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters, so INFO logs are
    // silenced while it runs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.extract_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let text = extract_text(&cli.input)
            .await
            .context("Failed to extract assignment text")?;
        io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn SolveProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;
    let student = StudentIdentity::new(cli.name.clone(), cli.roll.clone());

    // ── Solve (or render prepared markdown) ──────────────────────────────
    let output = match cli.markdown {
        Some(ref md_path) => render_prepared(&cli.input, md_path, &student, &config).await?,
        None => solve(&cli.input, &student, &config)
            .await
            .context("Solving failed")?,
    };

    let path = write_document(&cli.output_dir, &output, &config)
        .await
        .context("Failed to write solved document")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {}ms  →  {}",
            green("✔"),
            stats.total_duration_ms,
            bold(&path.display().to_string()),
        );
        if cli.markdown.is_none() {
            eprintln!(
                "   {} tokens in  /  {} tokens out",
                dim(&stats.input_tokens.to_string()),
                dim(&stats.output_tokens.to_string()),
            );
        }
    }

    Ok(())
}

/// Assemble from a markdown file; the input only supplies the filename.
async fn render_prepared(
    input: &Path,
    md_path: &Path,
    student: &StudentIdentity,
    config: &SolveConfig,
) -> Result<SolveOutput> {
    let markdown = tokio::fs::read_to_string(md_path)
        .await
        .with_context(|| format!("Failed to read markdown from {:?}", md_path))?;
    render_markdown(&filename_of(input), &markdown, student, config)
        .context("Failed to render markdown solution")
}

/// Map CLI args to `SolveConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SolveConfig> {
    let mut builder = SolveConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .max_retries(cli.max_retries)
        .logo_path(&cli.logo);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
