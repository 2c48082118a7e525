//! Plain-language summaries of a range of commits.

use git2::Repository;
use serde::Serialize;
use tracing::debug;

use crate::error::HistoryError;
use crate::git::{CommitRange, CommitType, ParsedCommit, fetch_commits, resolve_range};
use crate::llm::{LlmRouter, ResponseFormat, sanitize_for_prompt};

/// Default number of commits summarized when no `from` ref is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Which commits to summarize.
#[derive(Debug, Clone, Default)]
pub struct HistoryRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<usize>,
}

/// The LLM summary together with what it covered.
#[derive(Debug, Clone)]
pub struct HistorySummary {
    pub range: CommitRange,
    pub commits: Vec<ParsedCommit>,
    pub summary: String,
}

/// Commit as shown to the model.
#[derive(Serialize)]
struct PromptCommit<'a> {
    hash: &'a str,
    author: &'a str,
    date: String,
    #[serde(rename = "type")]
    commit_type: Option<&'a CommitType>,
    scope: Option<&'a str>,
    breaking: bool,
    message: String,
}

/// Resolve the range, walk it and ask the LLM for a summary.
pub async fn summarize_history(
    repo: &Repository,
    request: &HistoryRequest,
    router: &mut LlmRouter,
) -> Result<HistorySummary, HistoryError> {
    let limit = request.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let range = resolve_range(
        repo,
        request.from.as_deref(),
        request.to.as_deref(),
        limit,
    )?;
    let commits = fetch_commits(repo, range.from, range.to, Some(limit))?;
    debug!(
        "Summarizing {} commits in {}..{}",
        commits.len(),
        range.from_ref,
        range.to_ref
    );

    if commits.is_empty() {
        return Err(HistoryError::NoCommits {
            from: range.from_ref,
            to: range.to_ref,
        });
    }

    let prompt = build_history_prompt(&commits, &range);
    let completion = router.generate(&prompt, ResponseFormat::Text).await?;

    let summary = completion.output.trim().to_string();
    if summary.is_empty() {
        return Err(HistoryError::EmptySummary);
    }

    Ok(HistorySummary {
        range,
        commits,
        summary,
    })
}

/// Build the summary prompt. Commit messages are sanitized before they
/// are embedded.
pub fn build_history_prompt(commits: &[ParsedCommit], range: &CommitRange) -> String {
    let prompt_commits: Vec<PromptCommit<'_>> = commits
        .iter()
        .map(|c| PromptCommit {
            hash: c.short_hash(),
            author: &c.author,
            date: c.timestamp.format("%Y-%m-%d").to_string(),
            commit_type: c.commit_type.as_ref(),
            scope: c.scope.as_deref(),
            breaking: c.breaking,
            message: sanitize_for_prompt(&c.message),
        })
        .collect();

    let commits_json = serde_json::to_string_pretty(&prompt_commits).unwrap_or_default();
    let breaking_count = commits.iter().filter(|c| c.breaking).count();

    format!(
        r#"You are summarizing the recent history of a software project for a developer.

## Range
{from}..{to} ({count} commits, {breaking_count} marked breaking)

## Commits (newest first)
{commits_json}

## Instructions
1. Write a short overview paragraph of what changed in this range.
2. Follow with a bulleted list grouping related commits by theme.
3. Call out breaking changes explicitly.
4. Do not invent changes that are not in the commits above.

Respond with plain text only, no JSON."#,
        from = range.from_ref,
        to = range.to_ref,
        count = commits.len(),
    )
}
