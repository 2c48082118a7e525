//! Commit range resolution.

use git2::{Oid, Repository};
use tracing::debug;

use crate::error::GitError;

/// Resolved commit range. `from` is `None` when the range reaches the root.
#[derive(Debug, Clone)]
pub struct CommitRange {
    pub from: Option<Oid>,
    pub to: Oid,
    pub from_ref: String,
    pub to_ref: String,
}

/// Resolve a commit range from user-provided references.
///
/// If `to` is None, uses HEAD. If `from` is None, the range starts `limit`
/// first-parent commits back from `to`, or at the root when history is
/// shorter than that.
pub fn resolve_range(
    repo: &Repository,
    from: Option<&str>,
    to: Option<&str>,
    limit: usize,
) -> Result<CommitRange, GitError> {
    let to_ref = to.unwrap_or("HEAD");
    let to_oid = resolve_reference(repo, to_ref)?;

    let (from_oid, from_ref) = match from {
        Some(from_str) => (
            Some(resolve_reference(repo, from_str)?),
            from_str.to_string(),
        ),
        None => match ancestor(repo, to_oid, limit)? {
            Some(oid) => (Some(oid), format!("{}~{}", to_ref, limit)),
            None => (None, "root".to_string()),
        },
    };

    debug!("Resolved range {}..{}", from_ref, to_ref);

    Ok(CommitRange {
        from: from_oid,
        to: to_oid,
        from_ref,
        to_ref: to_ref.to_string(),
    })
}

/// Resolve a reference (tag, branch, commit hash) to an OID.
fn resolve_reference(repo: &Repository, reference: &str) -> Result<Oid, GitError> {
    if let Ok(oid) = Oid::from_str(reference)
        && repo.find_commit(oid).is_ok()
    {
        return Ok(oid);
    }

    let obj = repo
        .revparse_single(reference)
        .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e))?;
    Ok(obj.peel_to_commit().map_err(GitError::ParseCommit)?.id())
}

/// The commit `steps` first-parent hops behind `start`, if history is that deep.
fn ancestor(repo: &Repository, start: Oid, steps: usize) -> Result<Option<Oid>, GitError> {
    let mut commit = repo.find_commit(start).map_err(GitError::ParseCommit)?;
    for _ in 0..steps {
        match commit.parent(0) {
            Ok(parent) => commit = parent,
            Err(_) => return Ok(None),
        }
    }
    Ok(Some(commit.id()))
}
