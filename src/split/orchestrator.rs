//! The partial commit pipeline: apply, re-read, generate, commit.
//!
//! Each step depends on the previous one. Nothing is retried or rolled back
//! here; once the patch is applied, later failures leave it staged.

use crate::commit::MessageGenerator;
use crate::diff::{DiffChunk, SelectionSet, reconstruct};
use crate::error::{GenerateError, SplitError};
use crate::git::RepositoryAccessor;

/// A commit created from a chunk selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialCommit {
    pub message: String,
    pub commit_id: String,
}

/// Commit only the selected chunks.
///
/// Fails with [`SplitError::NoChunksSelected`] before touching the
/// repository or generator when the selection is empty.
pub async fn commit_selected<R, G>(
    chunks: &[DiffChunk],
    selection: &SelectionSet,
    repo: &R,
    generator: &mut G,
) -> Result<PartialCommit, SplitError>
where
    R: RepositoryAccessor + ?Sized,
    G: MessageGenerator + ?Sized,
{
    let patch = reconstruct(chunks, selection);
    commit_patch(&patch, repo, generator).await
}

/// Apply a reconstructed patch, then generate a message and commit.
///
/// An empty patch is the empty-selection signal.
pub async fn commit_patch<R, G>(
    patch: &str,
    repo: &R,
    generator: &mut G,
) -> Result<PartialCommit, SplitError>
where
    R: RepositoryAccessor + ?Sized,
    G: MessageGenerator + ?Sized,
{
    if patch.is_empty() {
        return Err(SplitError::NoChunksSelected);
    }

    repo.apply_patch(patch)
        .await
        .map_err(SplitError::PatchApplyFailed)?;

    commit_staged(repo, generator).await
}

/// Generate a message for whatever is staged and commit it.
///
/// This is the retry path after a failure that left the selection staged;
/// it never re-applies the patch.
pub async fn commit_staged<R, G>(repo: &R, generator: &mut G) -> Result<PartialCommit, SplitError>
where
    R: RepositoryAccessor + ?Sized,
    G: MessageGenerator + ?Sized,
{
    let staged = repo
        .staged_diff()
        .await
        .map_err(SplitError::StagedDiffFailed)?;

    let message = generator
        .generate(&staged)
        .await
        .map_err(SplitError::MessageGenerationFailed)?;
    if message.trim().is_empty() {
        return Err(SplitError::MessageGenerationFailed(
            GenerateError::EmptyMessage,
        ));
    }

    let commit_id = repo
        .commit(&message)
        .await
        .map_err(SplitError::CommitFailed)?;

    Ok(PartialCommit { message, commit_id })
}
