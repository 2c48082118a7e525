//! Grouping of classified diff lines into per-hunk chunks.

use std::fmt;

use super::tokenizer::{DiffLine, tokenize};

/// One hunk belonging to one file.
///
/// `lines` never contains a `diff --git` or `@@ ` line; those always close
/// the chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffChunk {
    /// Path the hunk applies to (post-image path on renames).
    pub file_path: String,
    /// The literal `@@ -a,b +c,d @@` line.
    pub hunk_header: String,
    /// Context, addition and deletion lines with their prefix character.
    pub lines: Vec<String>,
}

impl DiffChunk {
    fn open(file_path: &str, hunk_header: String) -> Self {
        Self {
            file_path: file_path.to_string(),
            hunk_header,
            lines: Vec::new(),
        }
    }

    pub fn additions(&self) -> usize {
        self.lines.iter().filter(|l| l.starts_with('+')).count()
    }

    pub fn deletions(&self) -> usize {
        self.lines.iter().filter(|l| l.starts_with('-')).count()
    }

    /// One-line description for list views: `path @@ ... @@ (+a -d)`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} (+{} -{})",
            self.file_path,
            self.hunk_header,
            self.additions(),
            self.deletions()
        )
    }
}

impl fmt::Display for DiffChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.hunk_header)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Assembler state.
enum State {
    /// No file boundary seen yet.
    Idle,
    /// Inside a file block, before its first hunk.
    InFile,
    /// Accumulating content lines for an open hunk.
    InHunk(DiffChunk),
}

/// Group classified lines into chunks, in source order.
///
/// Content that appears before the first hunk of a file (`index`, `---`,
/// `+++`, mode and rename lines) is dropped. A file boundary whose path
/// could not be parsed keeps the previous file's path.
pub fn assemble<I>(lines: I) -> Vec<DiffChunk>
where
    I: IntoIterator<Item = DiffLine>,
{
    let mut chunks = Vec::new();
    let mut current_path = String::new();
    let mut state = State::Idle;

    for line in lines {
        state = match (state, line) {
            (State::InHunk(chunk), DiffLine::FileBoundary { path }) => {
                chunks.push(chunk);
                if !path.is_empty() {
                    current_path = path;
                }
                State::InFile
            }
            (_, DiffLine::FileBoundary { path }) => {
                if !path.is_empty() {
                    current_path = path;
                }
                State::InFile
            }
            (State::InHunk(chunk), DiffLine::HunkBoundary(header)) => {
                chunks.push(chunk);
                State::InHunk(DiffChunk::open(&current_path, header))
            }
            (_, DiffLine::HunkBoundary(header)) => {
                State::InHunk(DiffChunk::open(&current_path, header))
            }
            (State::InHunk(mut chunk), DiffLine::Content(raw)) => {
                chunk.lines.push(raw);
                State::InHunk(chunk)
            }
            (other, DiffLine::Content(_)) => other,
        };
    }

    if let State::InHunk(chunk) = state {
        chunks.push(chunk);
    }

    chunks
}

/// Tokenize and assemble in one step.
pub fn parse_chunks(diff_text: &str) -> Vec<DiffChunk> {
    assemble(tokenize(diff_text))
}
