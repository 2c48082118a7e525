//! Provider selection and fallback orchestration.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::claude;
use crate::codex;
use crate::error::{ClaudeError, CodexError};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Claude,
    Codex,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the response a prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// A `{subject, body, breaking}` object. Codex enforces it with a schema.
    CommitMessage,
    /// Free-form text.
    Text,
}

/// Primary + fallback selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSelection {
    pub primary: Provider,
    pub fallback: Provider,
}

impl ProviderSelection {
    pub fn from_primary(primary: Provider) -> Self {
        let fallback = match primary {
            Provider::Claude => Provider::Codex,
            Provider::Codex => Provider::Claude,
        };
        Self { primary, fallback }
    }
}

impl Default for ProviderSelection {
    fn default() -> Self {
        ProviderSelection::from_primary(Provider::Claude)
    }
}

/// Provider-specific error wrapper.
#[derive(Debug)]
pub enum LlmProviderError {
    Claude(ClaudeError),
    Codex(CodexError),
}

impl LlmProviderError {
    pub fn provider(&self) -> Provider {
        match self {
            LlmProviderError::Claude(_) => Provider::Claude,
            LlmProviderError::Codex(_) => Provider::Codex,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            LlmProviderError::Claude(err) => summarize_claude_error(err),
            LlmProviderError::Codex(err) => summarize_codex_error(err),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            LlmProviderError::Claude(err) => err.to_string(),
            LlmProviderError::Codex(err) => err.to_string(),
        }
    }
}

impl fmt::Display for LlmProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for LlmProviderError {}

impl From<ClaudeError> for LlmProviderError {
    fn from(err: ClaudeError) -> Self {
        LlmProviderError::Claude(err)
    }
}

impl From<CodexError> for LlmProviderError {
    fn from(err: CodexError) -> Self {
        LlmProviderError::Codex(err)
    }
}

/// Both providers failed for one prompt.
#[derive(Debug)]
pub struct LlmError {
    pub primary: Provider,
    pub primary_error: LlmProviderError,
    pub fallback: Provider,
    pub fallback_error: LlmProviderError,
}

impl LlmError {
    pub fn summary(&self) -> String {
        format!(
            "Both LLM providers failed. {} error: {}. {} error: {}.",
            self.primary,
            self.primary_error.summary(),
            self.fallback,
            self.fallback_error.summary()
        )
    }

    pub fn detailed(&self) -> String {
        format!(
            "Both LLM providers failed. {} error: {}. {} error: {}.",
            self.primary,
            self.primary_error.detail(),
            self.fallback,
            self.fallback_error.detail()
        )
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for LlmError {}

/// Successful generation with the provider that produced it.
#[derive(Debug)]
pub struct LlmCompletion {
    pub output: String,
    pub provider: Provider,
    /// Set when the primary failed and the fallback answered.
    pub primary_error: Option<LlmProviderError>,
}

#[async_trait]
trait ProviderRunner: Send + Sync {
    async fn run(
        &self,
        provider: Provider,
        prompt: &str,
        format: ResponseFormat,
        timeout: Duration,
    ) -> Result<String, LlmProviderError>;
}

struct DefaultRunner;

#[async_trait]
impl ProviderRunner for DefaultRunner {
    async fn run(
        &self,
        provider: Provider,
        prompt: &str,
        format: ResponseFormat,
        timeout: Duration,
    ) -> Result<String, LlmProviderError> {
        match provider {
            Provider::Claude => claude::generate_with_retry(prompt, timeout)
                .await
                .map_err(LlmProviderError::from),
            Provider::Codex => {
                let structured = format == ResponseFormat::CommitMessage;
                codex::generate_with_retry(prompt, timeout, structured)
                    .await
                    .map_err(LlmProviderError::from)
            }
        }
    }
}

/// Provider router with fallback and stickiness.
///
/// When the fallback succeeds it becomes the primary for later calls.
pub struct LlmRouter {
    primary: Provider,
    fallback: Provider,
    timeout: Duration,
}

impl LlmRouter {
    pub fn new(selection: ProviderSelection, timeout: Duration) -> Self {
        Self {
            primary: selection.primary,
            fallback: selection.fallback,
            timeout,
        }
    }

    pub fn primary(&self) -> Provider {
        self.primary
    }

    pub fn fallback(&self) -> Provider {
        self.fallback
    }

    /// Run `prompt` on the primary provider, falling back on failure.
    pub async fn generate(
        &mut self,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<LlmCompletion, LlmError> {
        self.try_with_fallback(prompt, format, &DefaultRunner).await
    }

    async fn try_with_fallback<R: ProviderRunner>(
        &mut self,
        prompt: &str,
        format: ResponseFormat,
        runner: &R,
    ) -> Result<LlmCompletion, LlmError> {
        let primary = self.primary;
        let fallback = self.fallback;

        debug!("Prompting {} ({} chars)", primary, prompt.len());
        let primary_error = match runner.run(primary, prompt, format, self.timeout).await {
            Ok(output) => {
                return Ok(LlmCompletion {
                    output,
                    provider: primary,
                    primary_error: None,
                });
            }
            Err(e) => e,
        };

        warn!("{} failed ({}), trying {}", primary, primary_error.summary(), fallback);
        match runner.run(fallback, prompt, format, self.timeout).await {
            Ok(output) => {
                self.primary = fallback;
                self.fallback = primary;
                Ok(LlmCompletion {
                    output,
                    provider: fallback,
                    primary_error: Some(primary_error),
                })
            }
            Err(fallback_error) => Err(LlmError {
                primary,
                primary_error,
                fallback,
                fallback_error,
            }),
        }
    }
}

fn summarize_claude_error(err: &ClaudeError) -> String {
    match err {
        ClaudeError::NotInstalled => "Claude CLI not found".to_string(),
        ClaudeError::ExecutionFailed(_) => "Claude CLI reported an error".to_string(),
        ClaudeError::SpawnFailed(_) => "Failed to start Claude CLI".to_string(),
        ClaudeError::InvalidJson(_) => "Claude returned an invalid response envelope".to_string(),
        ClaudeError::Timeout(secs) => format!("Claude timed out after {}s", secs),
        ClaudeError::NonZeroExit { code, .. } => format!("Claude CLI exited with code {}", code),
        ClaudeError::RetriesExhausted(_) => "Claude failed after retries".to_string(),
    }
}

fn summarize_codex_error(err: &CodexError) -> String {
    match err {
        CodexError::NotInstalled => "Codex CLI not found".to_string(),
        CodexError::ExecutionFailed(_) => "Codex CLI reported an error".to_string(),
        CodexError::SpawnFailed(_) => "Failed to start Codex CLI".to_string(),
        CodexError::Timeout(secs) => format!("Codex timed out after {}s", secs),
        CodexError::NonZeroExit { code, .. } => format!("Codex CLI exited with code {}", code),
        CodexError::RetriesExhausted(_) => "Codex failed after retries".to_string(),
    }
}
