//! Error types for hunkcommit modules using thiserror.

use thiserror::Error;

/// Errors from git history operations (git2).
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),
}

/// Errors from the git CLI repository accessor.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Failed to run git {operation}: {source}")]
    Spawn {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("git {operation} produced non-UTF-8 output")]
    InvalidOutput { operation: String },
}

impl RepositoryError {
    /// The raw stderr reported by git, if this error came from a git command.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            RepositoryError::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Errors from Claude CLI operations.
#[derive(Error, Debug)]
pub enum ClaudeError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    NotInstalled,

    #[error("Claude Code CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn Claude process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Claude returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Claude process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Claude CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<ClaudeError>),
}

/// Errors from Codex CLI operations.
#[derive(Error, Debug)]
pub enum CodexError {
    #[error(
        "Codex CLI not found. Install with: npm install -g @openai/codex (then run `codex` or set CODEX_API_KEY)"
    )]
    NotInstalled,

    #[error("Codex CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn Codex process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Codex process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Codex CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<CodexError>),
}

/// Errors from the partial commit pipeline.
///
/// Each variant names the pipeline step that failed. Everything after
/// `PatchApplyFailed` leaves the selection staged.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("No chunks selected; select at least one chunk before committing")]
    NoChunksSelected,

    #[error("Failed to apply selected chunks to the index: {0}")]
    PatchApplyFailed(#[source] RepositoryError),

    #[error("Failed to read the staged diff after applying chunks: {0}")]
    StagedDiffFailed(#[source] RepositoryError),

    #[error("Failed to generate commit message (selection is still staged): {0}")]
    MessageGenerationFailed(#[source] GenerateError),

    #[error("Failed to create commit (selection is still staged): {0}")]
    CommitFailed(#[source] RepositoryError),
}

impl SplitError {
    /// Whether the selected chunks are staged in the index after this error.
    pub fn leaves_selection_staged(&self) -> bool {
        matches!(
            self,
            SplitError::StagedDiffFailed(_)
                | SplitError::MessageGenerationFailed(_)
                | SplitError::CommitFailed(_)
        )
    }
}

/// Errors from a commit message generator.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("{}", .0.summary())]
    Llm(#[from] crate::llm::LlmError),

    #[error("Generator returned an empty message")]
    EmptyMessage,

    #[error("{0}")]
    Other(String),
}

/// Errors from building the runtime configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Author identity needs both a name and an email (got only {present})")]
    IncompleteAuthor { present: &'static str },

    #[error("Unknown provider '{0}' (expected 'claude' or 'codex')")]
    UnknownProvider(String),
}

/// Errors from summarizing commit history.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("No commits found in range {from}..{to}")]
    NoCommits { from: String, to: String },

    #[error("LLM summary failed: {}", .0.summary())]
    Llm(#[from] crate::llm::LlmError),

    #[error("LLM returned an empty summary")]
    EmptySummary,
}
