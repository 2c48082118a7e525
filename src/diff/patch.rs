//! Rebuilding a unified diff from a subset of chunks.
//!
//! Hunk headers are copied verbatim and never renumbered. When only some
//! hunks of a file are selected and an omitted earlier hunk changes the line
//! count, the copied `+c` start of later hunks can disagree with the index.
//! `git apply` tolerates offsets for context-anchored hunks, so this is
//! usually harmless, but it is a known gap.

use super::chunk::DiffChunk;
use super::selection::SelectionSet;

/// How file headers are emitted for selected chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// A `diff --git` / `---` / `+++` block before every hunk.
    #[default]
    PerChunk,
    /// One header block per run of consecutive chunks sharing a file path.
    Grouped,
}

/// Build a patch containing only the selected chunks, in ascending index order.
///
/// Returns an empty string when nothing is selected.
pub fn reconstruct(chunks: &[DiffChunk], selection: &SelectionSet) -> String {
    reconstruct_with(chunks, selection, HeaderMode::PerChunk)
}

/// Same as [`reconstruct`] with an explicit header mode.
pub fn reconstruct_with(
    chunks: &[DiffChunk],
    selection: &SelectionSet,
    mode: HeaderMode,
) -> String {
    let mut patch = String::new();
    let mut last_path: Option<&str> = None;

    for index in selection.selected_indices() {
        let Some(chunk) = chunks.get(index) else {
            continue;
        };

        let needs_header = match mode {
            HeaderMode::PerChunk => true,
            HeaderMode::Grouped => last_path != Some(chunk.file_path.as_str()),
        };
        if needs_header {
            push_file_header(&mut patch, &chunk.file_path);
        }
        last_path = Some(&chunk.file_path);

        patch.push_str(&chunk.hunk_header);
        patch.push('\n');
        for line in &chunk.lines {
            patch.push_str(line);
            patch.push('\n');
        }
    }

    patch
}

fn push_file_header(patch: &mut String, path: &str) {
    patch.push_str(&format!("diff --git a/{path} b/{path}\n"));
    patch.push_str(&format!("--- a/{path}\n"));
    patch.push_str(&format!("+++ b/{path}\n"));
}

/// Count the hunks in a patch (lines starting with `@@ `).
pub fn count_hunks(patch: &str) -> usize {
    patch.lines().filter(|l| l.starts_with("@@ ")).count()
}
