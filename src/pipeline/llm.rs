//! LLM interaction: build the solve request and call the provider.
//!
//! All prompt text lives in
//! [`crate::prompts`] so it can change without touching retry or
//! error-handling logic here.
//!
//! ## Retry Strategy
//!
//! By default a solve request makes exactly one call. With `max_retries > 0`
//! failed calls are retried with exponential backoff
//! (`retry_backoff_ms * 2^(attempt-1)`): 500 ms → 1 s → 2 s with the default
//! base. A timed-out call counts as a failed attempt.

use crate::config::SolveConfig;
use crate::error::SolveError;
use crate::prompts::{render_prompt, DEFAULT_SYSTEM_PROMPT, SOLVE_PROMPT_TEMPLATE};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// What the model returned, before post-processing.
#[derive(Debug, Clone)]
pub struct Generation {
    pub markdown: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Calls made, the successful one included.
    pub attempts: u32,
}

/// Why a single call failed.
enum CallFailure {
    TimedOut(u64),
    Api(String),
}

/// Ask the model to solve one assignment.
///
/// ## Message Layout
///
/// 1. **System message** — the solver rules (or the configured override)
/// 2. **User message** — the prompt template with the assignment text embedded
pub async fn generate_solution(
    provider: &Arc<dyn LLMProvider>,
    filename: &str,
    assignment_text: &str,
    config: &SolveConfig,
) -> Result<Generation, SolveError> {
    let start = Instant::now();
    let messages = build_messages(assignment_text, config);
    let options = build_options(config);

    let mut last_failure: Option<CallFailure> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "{}: retry {}/{} after {}ms",
                filename, attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        let call = provider.chat(&messages, Some(&options));
        let result = match config.api_timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), call).await {
                Ok(r) => r.map_err(|e| CallFailure::Api(e.to_string())),
                Err(_) => Err(CallFailure::TimedOut(secs)),
            },
            None => call.await.map_err(|e| CallFailure::Api(e.to_string())),
        };

        match result {
            Ok(response) => {
                let duration = start.elapsed();
                debug!(
                    "{}: {} input tokens, {} output tokens, {:?}",
                    filename, response.prompt_tokens, response.completion_tokens, duration
                );
                return Ok(Generation {
                    markdown: response.content,
                    input_tokens: response.prompt_tokens as u64,
                    output_tokens: response.completion_tokens as u64,
                    attempts: attempt + 1,
                });
            }
            Err(failure) => {
                match &failure {
                    CallFailure::TimedOut(secs) => {
                        warn!("{}: attempt {} timed out after {}s", filename, attempt + 1, secs)
                    }
                    CallFailure::Api(msg) => {
                        warn!("{}: attempt {} failed — {}", filename, attempt + 1, msg)
                    }
                }
                last_failure = Some(failure);
            }
        }
    }

    let attempts = config.max_retries + 1;
    Err(match last_failure {
        Some(CallFailure::TimedOut(secs)) => SolveError::ApiTimeout { secs },
        Some(CallFailure::Api(message)) => SolveError::LlmApiError { attempts, message },
        None => SolveError::LlmApiError {
            attempts,
            message: "Unknown error".to_string(),
        },
    })
}

/// System prompt, then the rendered user prompt.
fn build_messages(assignment_text: &str, config: &SolveConfig) -> Vec<ChatMessage> {
    let (system, user) = prompt_texts(assignment_text, config);
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// `(system, user)` message text, overrides applied.
fn prompt_texts<'a>(assignment_text: &str, config: &'a SolveConfig) -> (&'a str, String) {
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let template = config
        .prompt_template
        .as_deref()
        .unwrap_or(SOLVE_PROMPT_TEMPLATE);

    (system_prompt, render_prompt(template, assignment_text))
}

/// Build `CompletionOptions` from the solve config.
fn build_options(config: &SolveConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
