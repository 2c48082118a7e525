//! Commit fetching and conventional commit parsing.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Commit, Oid, Repository};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GitError;

/// `type(scope)!: description`, scope and `!` optional.
static HEADER_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\w+)(?:\(([^)]+)\))?(!)?\s*:\s*").ok());

/// Conventional commit types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feat" => Ok(Self::Feat),
            "fix" => Ok(Self::Fix),
            "docs" => Ok(Self::Docs),
            "style" => Ok(Self::Style),
            "refactor" => Ok(Self::Refactor),
            "perf" => Ok(Self::Perf),
            "test" => Ok(Self::Test),
            "build" => Ok(Self::Build),
            "ci" => Ok(Self::Ci),
            "chore" => Ok(Self::Chore),
            _ => Err(format!("Unknown commit type: {}", s)),
        }
    }
}

/// A commit with its conventional commit header parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCommit {
    pub hash: String,
    pub author: String,
    pub message: String,
    pub commit_type: Option<CommitType>,
    pub scope: Option<String>,
    pub breaking: bool,
    pub timestamp: DateTime<Utc>,
}

impl ParsedCommit {
    /// Create a ParsedCommit from a git2 Commit.
    pub fn from_git2_commit(commit: &Commit) -> Self {
        let hash = commit.id().to_string();
        let author = commit.author().name().unwrap_or("unknown").to_string();
        let message = commit.message().unwrap_or("").to_string();
        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        let (commit_type, scope, breaking) = parse_commit_message(&message);

        Self {
            hash,
            author,
            message,
            commit_type,
            scope,
            breaking,
            timestamp,
        }
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Parse a conventional commit message.
/// Returns (commit_type, scope, breaking).
pub fn parse_commit_message(message: &str) -> (Option<CommitType>, Option<String>, bool) {
    let first_line = message.lines().next().unwrap_or("");

    let breaking_in_footer =
        message.contains("BREAKING CHANGE:") || message.contains("BREAKING-CHANGE:");

    let Some(caps) = HEADER_RE.as_ref().and_then(|re| re.captures(first_line)) else {
        return (None, None, breaking_in_footer);
    };

    let commit_type = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<CommitType>().ok());
    let scope = caps.get(2).map(|m| m.as_str().to_string());
    let breaking = caps.get(3).is_some() || breaking_in_footer;

    (commit_type, scope, breaking)
}

/// Fetch commits reachable from `to_oid` but not from `from_oid`, newest
/// first, stopping after `limit` commits when set.
pub fn fetch_commits(
    repo: &Repository,
    from_oid: Option<Oid>,
    to_oid: Oid,
    limit: Option<usize>,
) -> Result<Vec<ParsedCommit>, GitError> {
    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;

    revwalk.push(to_oid).map_err(GitError::RevwalkError)?;
    if let Some(from) = from_oid {
        revwalk.hide(from).map_err(GitError::RevwalkError)?;
    }

    let mut commits = Vec::new();

    for oid_result in revwalk.take(limit.unwrap_or(usize::MAX)) {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;
        commits.push(ParsedCommit::from_git2_commit(&commit));
    }

    Ok(commits)
}
