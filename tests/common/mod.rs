//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

use hunkcommit::commit::MessageGenerator;
use hunkcommit::error::GenerateError;
use hunkcommit::git::GitCli;

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory, configured so
    /// the `git` CLI can commit in it.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Accessor for the `git` CLI in this repository.
    pub fn cli(&self) -> GitCli {
        GitCli::new(self.path())
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Create a commit with the given message touching `test.txt`. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let content = format!(
            "{}\n{}",
            message,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        self.commit_files(message, &[("test.txt", &content)])
    }

    /// Write files, stage them and commit. Returns the commit OID.
    pub fn commit_files(&self, message: &str, files: &[(&str, &str)]) -> Oid {
        for (path, content) in files {
            self.write(path, content);
            self.stage(path);
        }

        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let sig = self.signature();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Write a file in the working tree.
    pub fn write(&self, path: &str, content: &str) {
        let full: PathBuf = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&full, content).expect("Failed to write file");
    }

    /// Add a working-tree file to the index.
    pub fn stage(&self, path: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(path)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Run the `git` CLI and return stdout. Panics on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("git output is not UTF-8")
    }

    /// Content of `path` at HEAD.
    pub fn head_file(&self, path: &str) -> String {
        self.git(&["show", &format!("HEAD:{path}")])
    }

    /// Full message of the HEAD commit.
    pub fn head_message(&self) -> String {
        self.git(&["log", "-1", "--format=%B"]).trim().to_string()
    }

    /// Create a branch pointing to the given OID.
    pub fn branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo.branch(name, &commit, false).expect("Failed to create branch");
    }

    /// Create a commit on top of `parent` without moving HEAD.
    pub fn commit_detached(&self, message: &str, parent: Oid) -> Oid {
        let sig = self.signature();
        let parent = self.repo.find_commit(parent).expect("Failed to find parent");
        let tree = parent.tree().expect("Failed to read tree");
        self.repo
            .commit(None, &sig, &sig, message, &tree, &[&parent])
            .expect("Failed to create commit")
    }

    /// Create a merge commit with two parents.
    pub fn merge_commit(&self, message: &str, first: Oid, second: Oid) -> Oid {
        let sig = self.signature();
        let first = self.repo.find_commit(first).expect("Failed to find first parent");
        let second = self.repo.find_commit(second).expect("Failed to find second parent");
        let tree = first.tree().expect("Failed to read tree");
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&first, &second])
            .expect("Failed to create merge commit")
    }
}

/// Twenty numbered lines, `line 1` to `line 20`.
pub fn numbered_lines() -> String {
    (1..=20).map(|i| format!("line {i}\n")).collect()
}

/// `numbered_lines` with the given 1-based lines replaced.
pub fn numbered_lines_with(replacements: &[(usize, &str)]) -> String {
    (1..=20)
        .map(|i| {
            let text = replacements
                .iter()
                .find(|(n, _)| *n == i)
                .map(|(_, t)| t.to_string())
                .unwrap_or_else(|| format!("line {i}"));
            format!("{text}\n")
        })
        .collect()
}

/// Generator that returns queued results and records the diffs it saw.
pub struct ScriptedGenerator {
    pub results: Vec<Result<String, GenerateError>>,
    pub seen: Vec<String>,
}

impl ScriptedGenerator {
    pub fn new(results: Vec<Result<String, GenerateError>>) -> Self {
        Self {
            results,
            seen: Vec::new(),
        }
    }

    pub fn always(message: &str) -> Self {
        Self::new(vec![Ok(message.to_string())])
    }
}

#[async_trait]
impl MessageGenerator for ScriptedGenerator {
    async fn generate(&mut self, diff_text: &str) -> Result<String, GenerateError> {
        self.seen.push(diff_text.to_string());
        match self.results.len() {
            0 => Err(GenerateError::Other("no scripted result left".to_string())),
            1 => match &self.results[0] {
                Ok(message) => Ok(message.clone()),
                Err(_) => Err(GenerateError::EmptyMessage),
            },
            _ => self.results.remove(0),
        }
    }
}
