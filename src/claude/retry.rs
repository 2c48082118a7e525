//! Retrying Claude CLI calls and unwrapping the JSON envelope.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ClaudeError;
use crate::llm::retry::{RetryPolicy, retry_with_backoff};

use super::subprocess::run_claude;

/// Trait for executing Claude CLI commands.
///
/// This abstraction allows mocking the Claude subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaudeExecutor: Send + Sync {
    /// Run Claude with the given prompt and return raw stdout.
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError>;
}

/// Executor that calls the real Claude CLI.
pub struct DefaultExecutor {
    pub timeout: Duration,
}

#[async_trait]
impl ClaudeExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError> {
        run_claude(prompt, self.timeout).await
    }
}

/// Prompt Claude and return the response text, retrying on failure.
pub async fn generate_with_retry(prompt: &str, timeout: Duration) -> Result<String, ClaudeError> {
    generate_with_retry_impl(prompt, &DefaultExecutor { timeout }, RetryPolicy::default()).await
}

pub(crate) async fn generate_with_retry_impl<E: ClaudeExecutor>(
    prompt: &str,
    executor: &E,
    policy: RetryPolicy,
) -> Result<String, ClaudeError> {
    retry_with_backoff(
        policy,
        || async { try_generate(prompt, executor).await },
        |e| ClaudeError::RetriesExhausted(Box::new(e)),
    )
    .await
}

async fn try_generate<E: ClaudeExecutor>(prompt: &str, executor: &E) -> Result<String, ClaudeError> {
    let stdout = executor.run(prompt).await?;
    parse_envelope(&stdout)
}

/// Claude CLI JSON envelope when using --output-format json
#[derive(Deserialize)]
struct ClaudeCliResponse {
    result: String,
    #[serde(default)]
    is_error: bool,
}

/// Unwrap the `--output-format json` envelope.
///
/// Plain-text stdout (older CLIs) is passed through unchanged. A JSON
/// object without a string `result` is rejected.
fn parse_envelope(stdout: &str) -> Result<String, ClaudeError> {
    let trimmed = stdout.trim();
    if !trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let envelope: ClaudeCliResponse = serde_json::from_str(trimmed)
        .map_err(|e| ClaudeError::InvalidJson(format!("{e}. Content: {trimmed}")))?;

    if envelope.is_error {
        return Err(ClaudeError::ExecutionFailed(envelope.result));
    }
    Ok(envelope.result)
}
