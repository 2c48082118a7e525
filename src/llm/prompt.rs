//! Prompt sanitizing shared by the commit and history prompts.

/// Maximum lines kept from a single free-text field.
const MAX_FIELD_LINES: usize = 50;

/// Neutralize markdown that could break out of the prompt structure.
///
/// Code fences become `'''`, headings lose their `##`, and the text is
/// capped at a fixed number of lines.
pub fn sanitize_for_prompt(text: &str) -> String {
    remove_ansi_escapes(&remove_control_chars(text))
        .replace("```", "'''")
        .replace("##", "//")
        .lines()
        .take(MAX_FIELD_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prepare diff text for embedding in a fenced block.
///
/// Removes ANSI escapes and control characters, neutralizes code fences,
/// and truncates on a char boundary to at most `max_chars` bytes.
/// Returns the text and whether it was truncated.
pub fn sanitize_diff(diff: &str, max_chars: usize) -> (String, bool) {
    let cleaned = remove_ansi_escapes(&remove_control_chars(diff)).replace("```", "'''");

    if cleaned.len() <= max_chars {
        return (cleaned, false);
    }

    let mut end = max_chars;
    while end > 0 && !cleaned.is_char_boundary(end) {
        end -= 1;
    }
    // Cut at the last full line so no hunk line is split.
    let cut = cleaned[..end].rfind('\n').map(|i| i + 1).unwrap_or(end);
    (cleaned[..cut].to_string(), true)
}

/// Drop control characters other than newline and tab. ESC is kept so
/// [`remove_ansi_escapes`] can still recognize sequences.
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\u{1b}'))
        .collect()
}

/// Strip CSI escape sequences (`ESC [ ... final-byte`) and lone ESC bytes.
pub fn remove_ansi_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
        }
    }

    out
}
