//! Git access: the CLI-backed repository accessor and git2 history walks.

pub mod commits;
pub mod range;
pub mod repository;

pub use commits::{CommitType, ParsedCommit, fetch_commits, parse_commit_message};
pub use range::{CommitRange, resolve_range};
pub use repository::{GitCli, RepositoryAccessor};
