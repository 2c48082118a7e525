//! Splitting staged changes into a commit of selected chunks.

pub mod orchestrator;
pub mod session;

pub use orchestrator::{PartialCommit, commit_patch, commit_selected, commit_staged};
pub use session::{Effect, Outcome, SessionEvent, SplitSession};
