//! hunkcommit - split staged changes into commits with generated messages.
//!
//! # Overview
//!
//! hunkcommit parses the staged diff into per-hunk chunks, lets the user
//! pick a subset, stages exactly that subset and commits it with a
//! Conventional Commit message written by the Claude or Codex CLI.
//!
//! The chunk model ([`diff`]) and the commit pipeline ([`split`]) do no I/O
//! of their own; the repository and message generator are passed in as
//! traits.

pub mod claude;
pub mod codex;
pub mod commit;
pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod history;
pub mod llm;
pub mod split;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use diff::{DiffChunk, HeaderMode, SelectionSet, parse_chunks, reconstruct};
pub use error::{
    ClaudeError, CodexError, ConfigError, GenerateError, GitError, HistoryError, RepositoryError,
    SplitError,
};
pub use split::{Outcome, PartialCommit, SplitSession, commit_selected};
