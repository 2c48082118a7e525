//! Exponential backoff retry logic for Codex CLI.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CodexError;
use crate::llm::retry::{RetryPolicy, retry_with_backoff};

use super::subprocess::{COMMIT_MESSAGE_SCHEMA, run_codex};

/// Trait for executing Codex CLI commands.
///
/// This abstraction allows mocking the Codex subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodexExecutor: Send + Sync {
    /// Run Codex with the given prompt and return the raw response.
    async fn run(&self, prompt: &str) -> Result<String, CodexError>;
}

/// Executor that calls the real Codex CLI.
pub struct DefaultExecutor {
    pub timeout: Duration,
    /// Constrain output to the commit message schema.
    pub structured: bool,
}

#[async_trait]
impl CodexExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, CodexError> {
        let schema = self.structured.then_some(COMMIT_MESSAGE_SCHEMA);
        run_codex(prompt, self.timeout, schema).await
    }
}

/// Prompt Codex and return the trimmed response, retrying on failure.
pub async fn generate_with_retry(
    prompt: &str,
    timeout: Duration,
    structured: bool,
) -> Result<String, CodexError> {
    let executor = DefaultExecutor {
        timeout,
        structured,
    };
    generate_with_retry_impl(prompt, &executor, RetryPolicy::default()).await
}

pub(crate) async fn generate_with_retry_impl<E: CodexExecutor>(
    prompt: &str,
    executor: &E,
    policy: RetryPolicy,
) -> Result<String, CodexError> {
    retry_with_backoff(
        policy,
        || async { try_generate(prompt, executor).await },
        |e| CodexError::RetriesExhausted(Box::new(e)),
    )
    .await
}

async fn try_generate<E: CodexExecutor>(prompt: &str, executor: &E) -> Result<String, CodexError> {
    let response = executor.run(prompt).await?;
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(CodexError::ExecutionFailed(
            "Codex returned an empty response".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
