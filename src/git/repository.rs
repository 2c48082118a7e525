//! Repository access through the system `git` binary.
//!
//! Staging goes through the git CLI rather than git2 so that `git apply`
//! semantics (atomic apply, offset tolerance) and the user's hooks and
//! config are honored.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::AuthorIdentity;
use crate::diff::{FilterOptions, filter_diff};
use crate::error::RepositoryError;

/// What the commit pipeline needs from a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryAccessor: Send + Sync {
    /// Unified diff of staged changes, with binary files removed.
    async fn staged_diff(&self) -> Result<String, RepositoryError>;

    /// Stage exactly the hunks in `patch` relative to HEAD. All or nothing.
    async fn apply_patch(&self, patch: &str) -> Result<(), RepositoryError>;

    /// Commit the staged content. Returns the new commit id.
    async fn commit(&self, message: &str) -> Result<String, RepositoryError>;

    /// Current branch name (`HEAD` when detached).
    async fn current_branch(&self) -> Result<String, RepositoryError>;
}

/// [`RepositoryAccessor`] backed by `git` subprocesses in a working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    author: Option<AuthorIdentity>,
    filter: FilterOptions,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            author: None,
            filter: FilterOptions::default(),
        }
    }

    /// Commit with this author instead of the git config identity.
    pub fn with_author(mut self, author: Option<AuthorIdentity>) -> Self {
        self.author = author;
        self
    }

    pub fn with_filter(mut self, filter: FilterOptions) -> Self {
        self.filter = filter;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run git and return stdout, or a `CommandFailed` carrying stderr.
    async fn run(&self, args: &[&str], operation: &str) -> Result<String, RepositoryError> {
        self.run_with_stdin(args, None, operation).await
    }

    async fn run_with_stdin(
        &self,
        args: &[&str],
        stdin: Option<&str>,
        operation: &str,
    ) -> Result<String, RepositoryError> {
        debug!("git {}", args.join(" "));

        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.workdir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let spawn_err = |source| RepositoryError::Spawn {
            operation: operation.to_string(),
            source,
        };

        let mut child = cmd.spawn().map_err(spawn_err)?;

        if let Some(input) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(input.as_bytes()).await.map_err(spawn_err)?;
            // Dropping the handle closes stdin so git sees EOF.
            drop(pipe);
        }

        let output = child.wait_with_output().await.map_err(spawn_err)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RepositoryError::CommandFailed {
                operation: operation.to_string(),
                stderr,
            });
        }

        String::from_utf8(output.stdout).map_err(|_| RepositoryError::InvalidOutput {
            operation: operation.to_string(),
        })
    }

    /// Whether HEAD points at a commit (false on an unborn branch).
    async fn has_head(&self) -> bool {
        self.run(&["rev-parse", "--verify", "--quiet", "HEAD"], "rev-parse HEAD")
            .await
            .is_ok()
    }

    /// Reset the index to HEAD (or to empty on an unborn branch).
    async fn reset_index(&self) -> Result<(), RepositoryError> {
        if self.has_head().await {
            self.run(&["reset", "-q"], "reset index").await?;
        } else {
            self.run(&["read-tree", "--empty"], "reset index").await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryAccessor for GitCli {
    async fn staged_diff(&self) -> Result<String, RepositoryError> {
        let raw = self
            .run(
                &["diff", "--cached", "--no-color", "--no-ext-diff"],
                "diff --cached",
            )
            .await?;

        let filtered = filter_diff(&raw, self.filter);
        if !filtered.skipped_binary.is_empty() {
            debug!("Skipped binary files: {:?}", filtered.skipped_binary);
        }
        if !filtered.skipped_lockfiles.is_empty() {
            debug!("Skipped lock files: {:?}", filtered.skipped_lockfiles);
        }

        Ok(filtered.text)
    }

    async fn apply_patch(&self, patch: &str) -> Result<(), RepositoryError> {
        let snapshot = self.run(&["write-tree"], "write-tree").await?;
        let snapshot = snapshot.trim();

        self.reset_index().await?;

        let applied = self
            .run_with_stdin(
                &["apply", "--cached", "--whitespace=nowarn", "-"],
                Some(patch),
                "apply --cached",
            )
            .await;

        if let Err(apply_err) = applied {
            if let Err(restore_err) = self.run(&["read-tree", snapshot], "read-tree").await {
                warn!("Failed to restore index after rejected patch: {restore_err}");
            }
            return Err(apply_err);
        }

        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<String, RepositoryError> {
        let author_arg = self
            .author
            .as_ref()
            .map(|a| format!("--author={}", a.signature()));

        let mut args = vec!["commit", "-q", "-m", message];
        if let Some(ref author) = author_arg {
            args.push(author);
        }
        self.run(&args, "commit").await?;

        let oid = self.run(&["rev-parse", "HEAD"], "rev-parse HEAD").await?;
        Ok(oid.trim().to_string())
    }

    async fn current_branch(&self) -> Result<String, RepositoryError> {
        // symbolic-ref works on unborn branches, rev-parse does not.
        match self
            .run(&["symbolic-ref", "--short", "-q", "HEAD"], "symbolic-ref")
            .await
        {
            Ok(name) => Ok(name.trim().to_string()),
            Err(_) => Ok("HEAD".to_string()),
        }
    }
}
