//! Summaries of staged diff text for the commit prompt.

use std::fmt;

use crate::diff::tokenizer::{FILE_BOUNDARY_PREFIX, HUNK_BOUNDARY_PREFIX, parse_file_path};
use crate::llm::prompt::sanitize_diff;

/// Status of a changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
        }
    }
}

/// A file touched by the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,
    pub status: FileStatus,
    /// Old path for renamed files (None for non-rename changes).
    pub old_path: Option<String>,
}

/// Summary of a diff as fed to the commit prompt.
#[derive(Debug, Clone)]
pub struct DiffSummary {
    /// Sanitized, possibly truncated diff text.
    pub diff_text: String,
    pub changed_files: Vec<ChangedFile>,
    pub truncated: bool,
    pub additions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.changed_files.is_empty()
    }
}

/// Summarize unified diff text.
///
/// File status comes from the extended header lines (`new file mode`,
/// `deleted file mode`, `rename from`/`rename to`). Additions and deletions
/// are counted inside hunks only, so `---`/`+++` headers are not counted.
/// Counts always cover the full diff even when `diff_text` is truncated.
pub fn summarize_diff(text: &str, max_chars: usize) -> DiffSummary {
    let mut changed_files: Vec<ChangedFile> = Vec::new();
    let mut additions = 0usize;
    let mut deletions = 0usize;
    let mut in_hunk = false;

    for line in text.split('\n') {
        if line.starts_with(FILE_BOUNDARY_PREFIX) {
            in_hunk = false;
            changed_files.push(ChangedFile {
                path: parse_file_path(line),
                status: FileStatus::Modified,
                old_path: None,
            });
            continue;
        }
        if line.starts_with(HUNK_BOUNDARY_PREFIX) {
            in_hunk = true;
            continue;
        }

        if in_hunk {
            if line.starts_with('+') {
                additions += 1;
            } else if line.starts_with('-') {
                deletions += 1;
            }
            continue;
        }

        let Some(file) = changed_files.last_mut() else {
            continue;
        };
        if line.starts_with("new file mode") {
            file.status = FileStatus::Added;
        } else if line.starts_with("deleted file mode") {
            file.status = FileStatus::Deleted;
        } else if let Some(from) = line.strip_prefix("rename from ") {
            file.status = FileStatus::Renamed;
            file.old_path = Some(from.to_string());
        } else if let Some(to) = line.strip_prefix("rename to ") {
            file.status = FileStatus::Renamed;
            file.path = to.to_string();
        }
    }

    let (diff_text, truncated) = sanitize_diff(text, max_chars);

    DiffSummary {
        diff_text,
        changed_files,
        truncated,
        additions,
        deletions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = concat!(
        "diff --git a/src/lib.rs b/src/lib.rs\n",
        "index 1111111..2222222 100644\n",
        "--- a/src/lib.rs\n",
        "+++ b/src/lib.rs\n",
        "@@ -1,3 +1,3 @@\n",
        " use std::fmt;\n",
        "-pub mod old;\n",
        "+pub mod new;\n",
        "+pub mod extra;\n",
        "diff --git a/notes.md b/notes.md\n",
        "new file mode 100644\n",
        "index 0000000..3333333\n",
        "--- /dev/null\n",
        "+++ b/notes.md\n",
        "@@ -0,0 +1 @@\n",
        "+hello\n",
        "diff --git a/gone.txt b/gone.txt\n",
        "deleted file mode 100644\n",
        "--- a/gone.txt\n",
        "+++ /dev/null\n",
        "@@ -1 +0,0 @@\n",
        "-bye\n",
        "diff --git a/old/name.rs b/new/name.rs\n",
        "similarity index 100%\n",
        "rename from old/name.rs\n",
        "rename to new/name.rs\n",
    );

    #[test]
    fn test_file_status_display() {
        assert_eq!(FileStatus::Added.to_string(), "Added");
        assert_eq!(FileStatus::Modified.to_string(), "Modified");
        assert_eq!(FileStatus::Deleted.to_string(), "Deleted");
        assert_eq!(FileStatus::Renamed.to_string(), "Renamed");
    }

    #[test]
    fn test_summarize_detects_statuses() {
        let summary = summarize_diff(MIXED, 30_000);
        let statuses: Vec<(&str, &FileStatus)> = summary
            .changed_files
            .iter()
            .map(|f| (f.path.as_str(), &f.status))
            .collect();

        assert_eq!(
            statuses,
            vec![
                ("src/lib.rs", &FileStatus::Modified),
                ("notes.md", &FileStatus::Added),
                ("gone.txt", &FileStatus::Deleted),
                ("new/name.rs", &FileStatus::Renamed),
            ]
        );
        assert_eq!(summary.changed_files[3].old_path.as_deref(), Some("old/name.rs"));
    }

    #[test]
    fn test_summarize_counts_only_hunk_lines() {
        let summary = summarize_diff(MIXED, 30_000);
        assert_eq!(summary.additions, 3);
        assert_eq!(summary.deletions, 2);
        assert!(!summary.truncated);
    }

    #[test]
    fn test_summarize_truncates_text_but_not_counts() {
        let summary = summarize_diff(MIXED, 64);
        assert!(summary.truncated);
        assert!(summary.diff_text.len() <= 64);
        assert_eq!(summary.additions, 3);
        assert_eq!(summary.changed_files.len(), 4);
    }

    #[test]
    fn test_summarize_empty_diff() {
        let summary = summarize_diff("", 30_000);
        assert!(summary.is_empty());
        assert_eq!(summary.additions, 0);
    }
}
