//! Upstream filtering of staged diff text.
//!
//! Drops whole file blocks that the chunk engine should never see: binary
//! changes and, optionally, lock files.

use std::path::Path;

use super::tokenizer::{FILE_BOUNDARY_PREFIX, parse_file_path};

/// Lock files that add noise to message generation.
pub const LOCKFILE_NAMES: &[&str] = &[
    "Cargo.lock",
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "poetry.lock",
    "Pipfile.lock",
    "uv.lock",
    "Gemfile.lock",
    "composer.lock",
    "go.sum",
    "flake.lock",
];

/// What to drop from a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub exclude_lockfiles: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            exclude_lockfiles: true,
        }
    }
}

/// Result of filtering, with the paths that were removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredDiff {
    pub text: String,
    pub skipped_binary: Vec<String>,
    pub skipped_lockfiles: Vec<String>,
}

/// Remove binary and (optionally) lock-file blocks from `diff_text`.
///
/// Kept blocks are copied byte for byte, line endings included.
pub fn filter_diff(diff_text: &str, options: FilterOptions) -> FilteredDiff {
    let mut result = FilteredDiff::default();

    for block in split_file_blocks(diff_text) {
        let Some(header) = block.first() else {
            continue;
        };

        if header.starts_with(FILE_BOUNDARY_PREFIX) {
            let path = parse_file_path(header.trim_end_matches('\n'));

            if is_binary_block(&block) {
                result.skipped_binary.push(path);
                continue;
            }
            if options.exclude_lockfiles && is_lockfile(&path) {
                result.skipped_lockfiles.push(path);
                continue;
            }
        }

        for line in block {
            result.text.push_str(line);
        }
    }

    result
}

/// Whether `path` names a known lock file (by file name, any directory).
pub fn is_lockfile(path: &str) -> bool {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| LOCKFILE_NAMES.contains(&name))
}

/// Split into blocks that each start at a `diff --git` line. Text before
/// the first boundary forms its own leading block.
fn split_file_blocks(diff_text: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();

    for line in diff_text.split_inclusive('\n') {
        if line.starts_with(FILE_BOUNDARY_PREFIX) || blocks.is_empty() {
            blocks.push(Vec::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    blocks
}

fn is_binary_block(block: &[&str]) -> bool {
    block.iter().any(|line| {
        let line = line.trim_end_matches(['\n', '\r']);
        (line.starts_with("Binary files ") && line.ends_with(" differ"))
            || line == "GIT binary patch"
    })
}
