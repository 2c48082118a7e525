//! AI-generated commit messages using LLM providers.

pub mod diff;
pub mod generator;
pub mod message;
pub mod prompt;

pub use diff::{ChangedFile, DiffSummary, FileStatus, summarize_diff};
pub use generator::{LlmMessageGenerator, MessageGenerator};
pub use message::{CommitMessage, message_from_response};
pub use prompt::build_commit_prompt;
