//! Line classification for unified diff text.
//!
//! A single pass over the input that tags every line as a file boundary,
//! a hunk boundary or plain content. Classification never fails: anything
//! that is not a boundary is carried through as content, byte for byte.

/// Prefix that opens a new file block.
pub const FILE_BOUNDARY_PREFIX: &str = "diff --git ";

/// Prefix that opens a new hunk.
pub const HUNK_BOUNDARY_PREFIX: &str = "@@ ";

/// One classified line of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// A `diff --git` line. `path` is empty when the header could not be parsed.
    FileBoundary { path: String },
    /// A `@@ -a,b +c,d @@` line, kept verbatim.
    HunkBoundary(String),
    /// Any other line, kept verbatim (including empty lines and `\r`).
    Content(String),
}

/// Classify every line of `diff_text`.
///
/// Lines are split on `\n` only, so `\r\n` endings survive as a trailing `\r`
/// in the line. A single trailing newline does not produce an extra empty line.
pub fn tokenize(diff_text: &str) -> Vec<DiffLine> {
    if diff_text.is_empty() {
        return Vec::new();
    }

    let body = diff_text.strip_suffix('\n').unwrap_or(diff_text);

    body.split('\n').map(classify_line).collect()
}

/// Classify a single line. Prefix checks run in boundary priority order.
pub fn classify_line(line: &str) -> DiffLine {
    if line.starts_with(FILE_BOUNDARY_PREFIX) {
        DiffLine::FileBoundary {
            path: parse_file_path(line),
        }
    } else if line.starts_with(HUNK_BOUNDARY_PREFIX) {
        DiffLine::HunkBoundary(line.to_string())
    } else {
        DiffLine::Content(line.to_string())
    }
}

/// Resolve the file path a `diff --git a/<old> b/<new>` header refers to.
///
/// Returns the shared path when old and new are identical, otherwise the
/// post-image (`b/`) path. Returns an empty string when the header has no
/// recognizable path fields.
///
/// Resolution order:
/// 1. Symmetric split: `a/P b/P` with the same `P` on both sides, which
///    handles paths containing spaces and ` b/`.
/// 2. Structural split at the last ` b/`, as `a/(.*) b/(.*)$` would match.
/// 3. Whitespace fields 3 and 4 with `a/` / `b/` stripped.
pub fn parse_file_path(line: &str) -> String {
    let Some(rest) = line.strip_prefix(FILE_BOUNDARY_PREFIX) else {
        return String::new();
    };
    let rest = rest.trim_end_matches('\r');

    if let Some(path) = split_symmetric(rest) {
        return path.to_string();
    }

    if let Some(old) = rest.strip_prefix("a/")
        && let Some(idx) = old.rfind(" b/")
    {
        let (old_path, new_path) = (&old[..idx], &old[idx + 3..]);
        if !new_path.is_empty() {
            return pick_path(old_path, new_path).to_string();
        }
    }

    split_fields(line)
}

/// Match `a/P b/P` where both halves name the same path.
fn split_symmetric(rest: &str) -> Option<&str> {
    let inner = rest.strip_prefix("a/")?;
    // inner == P + " b/" + P
    let total = inner.len().checked_sub(3)?;
    if total % 2 != 0 {
        return None;
    }
    let half = total / 2;
    let old = inner.get(..half)?;
    let sep = inner.get(half..half + 3)?;
    let new = inner.get(half + 3..)?;

    (sep == " b/" && old == new && !old.is_empty()).then_some(old)
}

/// Fixed-position fallback: fields 3 and 4 of the space-split header.
fn split_fields(line: &str) -> String {
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < 4 {
        return String::new();
    }

    let old = fields[2].strip_prefix("a/").unwrap_or(fields[2]);
    let new = fields[3].strip_prefix("b/").unwrap_or(fields[3]);
    pick_path(old, new).to_string()
}

fn pick_path<'a>(old: &'a str, new: &'a str) -> &'a str {
    if old == new { old } else { new }
}
