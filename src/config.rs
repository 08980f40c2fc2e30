//! Configuration for one solve request.
//!
//! Every knob lives in [`SolveConfig`], built via [`SolveConfigBuilder`].
//! Callers set only what they care about; the rest falls back to the
//! documented defaults below.

use crate::error::SolveError;
use crate::progress::ProgressCallback;
use crate::prompts::ASSIGNMENT_PLACEHOLDER;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Logo used on the cover page when none is configured.
pub const DEFAULT_LOGO_PATH: &str = "assets/logo.png";

/// Model used when only `GEMINI_API_KEY` is available.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Configuration for a solve request.
///
/// Built via [`SolveConfig::builder()`] or using [`SolveConfig::default()`].
///
/// # Example
/// ```rust
/// use gcr_solve::SolveConfig;
///
/// let config = SolveConfig::builder()
///     .model("gemini-2.0-flash")
///     .temperature(0.2)
///     .max_retries(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_retries, 2);
/// ```
#[derive(Clone)]
pub struct SolveConfig {
    /// LLM model identifier, e.g. "gemini-2.0-flash".
    /// If None, the provider's default (or [`DEFAULT_GEMINI_MODEL`]) is used.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "ollama").
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Range 0.0–2.0. Default: 0.4.
    ///
    /// Solutions benefit from some freedom of phrasing, but the answers must
    /// stay on the assignment's questions.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// Multi-question assignments with code listings run long; a low cap
    /// truncates the last answer mid-sentence.
    pub max_tokens: usize,

    /// Retry attempts after a failed LLM call. Default: 0 (a single call).
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled after each attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-call timeout in seconds. Default: None (wait for the provider).
    pub api_timeout_secs: Option<u64>,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Custom user prompt template. Must contain `{assignment}`.
    pub prompt_template: Option<String>,

    /// Cover-page logo. A missing file only drops the image. Default: `assets/logo.png`.
    pub logo_path: Option<PathBuf>,

    /// Optional stage-progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.4,
            max_tokens: 8192,
            max_retries: 0,
            retry_backoff_ms: 500,
            api_timeout_secs: None,
            system_prompt: None,
            prompt_template: None,
            logo_path: Some(PathBuf::from(DEFAULT_LOGO_PATH)),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SolveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("prompt_template", &self.prompt_template.is_some())
            .field("logo_path", &self.logo_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SolveProgressCallback>"),
            )
            .finish()
    }
}

impl SolveConfig {
    /// Create a new builder for `SolveConfig`.
    pub fn builder() -> SolveConfigBuilder {
        SolveConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SolveConfig`].
pub struct SolveConfigBuilder {
    config: SolveConfig,
}

impl fmt::Debug for SolveConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl SolveConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn logo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.logo_path = Some(path.into());
        self
    }

    /// Produce documents without a cover logo.
    pub fn no_logo(mut self) -> Self {
        self.config.logo_path = None;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SolveConfig, SolveError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(SolveError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(SolveError::InvalidConfig(
                "api_timeout_secs must be ≥ 1 when set".into(),
            ));
        }
        if let Some(template) = &c.prompt_template {
            if !template.contains(ASSIGNMENT_PLACEHOLDER) {
                return Err(SolveError::InvalidConfig(format!(
                    "prompt template must contain {ASSIGNMENT_PLACEHOLDER}"
                )));
            }
        }
        if c.system_prompt.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(SolveError::InvalidConfig(
                "system prompt must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SolveConfig::default();
        assert_eq!(c.temperature, 0.4);
        assert_eq!(c.max_tokens, 8192);
        assert_eq!(c.max_retries, 0);
        assert_eq!(c.retry_backoff_ms, 500);
        assert_eq!(c.api_timeout_secs, None);
        assert_eq!(c.logo_path, Some(PathBuf::from(DEFAULT_LOGO_PATH)));
    }

    #[test]
    fn temperature_is_clamped() {
        let c = SolveConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = SolveConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = SolveConfig::builder()
            .prompt_template("Solve this please")
            .build()
            .unwrap_err();
        assert!(matches!(err, SolveError::InvalidConfig(_)));
        assert!(err.to_string().contains("{assignment}"));
    }

    #[test]
    fn template_with_placeholder_is_accepted() {
        let c = SolveConfig::builder()
            .prompt_template("Answer:\n{assignment}")
            .build()
            .unwrap();
        assert!(c.prompt_template.is_some());
    }

    #[test]
    fn zero_timeout_and_tokens_are_rejected() {
        assert!(SolveConfig::builder().api_timeout_secs(0).build().is_err());
        assert!(SolveConfig::builder().max_tokens(0).build().is_err());
    }

    #[test]
    fn blank_system_prompt_is_rejected() {
        assert!(SolveConfig::builder().system_prompt("   ").build().is_err());
    }

    #[test]
    fn no_logo_clears_path() {
        let c = SolveConfig::builder().no_logo().build().unwrap();
        assert!(c.logo_path.is_none());
    }

    #[test]
    fn debug_hides_provider_and_prompts() {
        let c = SolveConfig::builder()
            .system_prompt("secret instructions")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret instructions"), "got: {dbg}");
        assert!(dbg.contains("SolveConfig"));
    }
}
