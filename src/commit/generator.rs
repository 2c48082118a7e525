//! Commit message generators.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::commit::diff::summarize_diff;
use crate::commit::message::message_from_response;
use crate::commit::prompt::build_commit_prompt;
use crate::error::GenerateError;
use crate::llm::{LlmRouter, ResponseFormat};

/// Produces a commit message for a diff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGenerator: Send {
    /// Return the commit message for `diff_text`. Implementations fail with
    /// [`GenerateError::EmptyMessage`] rather than returning blank text.
    async fn generate(&mut self, diff_text: &str) -> Result<String, GenerateError>;
}

/// [`MessageGenerator`] backed by the Claude/Codex router.
pub struct LlmMessageGenerator {
    router: LlmRouter,
    branch: String,
    max_diff_chars: usize,
}

impl LlmMessageGenerator {
    pub fn new(router: LlmRouter, branch: impl Into<String>, max_diff_chars: usize) -> Self {
        Self {
            router,
            branch: branch.into(),
            max_diff_chars,
        }
    }

    pub fn router(&self) -> &LlmRouter {
        &self.router
    }

    fn prompt_for(&self, diff_text: &str) -> String {
        let summary = summarize_diff(diff_text, self.max_diff_chars);
        debug!(
            "Diff: {} files, {} additions, {} deletions, truncated={}",
            summary.changed_files.len(),
            summary.additions,
            summary.deletions,
            summary.truncated
        );
        build_commit_prompt(&summary, &self.branch)
    }
}

#[async_trait]
impl MessageGenerator for LlmMessageGenerator {
    async fn generate(&mut self, diff_text: &str) -> Result<String, GenerateError> {
        let prompt = self.prompt_for(diff_text);
        debug!("Commit prompt length: {} chars", prompt.len());

        let completion = self
            .router
            .generate(&prompt, ResponseFormat::CommitMessage)
            .await?;

        if let Some(err) = &completion.primary_error {
            warn!(
                "Used {} after primary provider failed: {}",
                completion.provider,
                err.summary()
            );
        }

        message_from_response(&completion.output).ok_or(GenerateError::EmptyMessage)
    }
}
