//! Prompt construction for AI-generated commit messages.

use crate::commit::diff::DiffSummary;
use crate::llm::prompt::sanitize_for_prompt;

/// Build the LLM prompt for generating a commit message.
///
/// Includes the list of changed files, the sanitized diff, and the branch name
/// for issue reference extraction. Requests JSON output for reliable parsing.
pub fn build_commit_prompt(diff: &DiffSummary, branch_name: &str) -> String {
    let files_section: String = diff
        .changed_files
        .iter()
        .map(|f| match &f.old_path {
            Some(old) => format!("- {} ({} from {})", f.path, f.status, old),
            None => format!("- {} ({})", f.path, f.status),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let truncation_note = if diff.truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    let branch = sanitize_for_prompt(branch_name);

    format!(
        r#"You are generating a Git commit message following the Conventional Commits specification.
The diff below is exactly what will be committed; describe only these changes.

## Changed Files ({additions} additions, {deletions} deletions)
{files_section}

## Diff
```
{diff_text}
```{truncation_note}

## Branch Context
Branch: {branch}

## Subject Line Rules (STRICT)
- Format: `type(scope): description`
- Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Scope: infer from the primary module affected. Omit it if the change spans unrelated areas.
- Description: imperative mood ("add", "fix", "remove"), lowercase after colon, NO period at end
- HARD LIMIT: the ENTIRE subject line MUST be at most 50 characters.

## Body Rules
The diff already shows WHAT changed. The body should explain WHY.
- Wrap lines at 72 characters
- If the branch contains an issue key (e.g., `feat/ABC-42`), add `Closes ABC-42` on its own line
- For trivial changes (typos, formatting), body may be null

## Breaking Changes
Set `breaking: true` ONLY if a public API or CLI interface changes incompatibly.

## Output Format
Respond with ONLY a JSON object (no markdown, no explanation):
{{"subject": "type(scope): desc", "body": "why this change was made", "breaking": false}}"#,
        additions = diff.additions,
        deletions = diff.deletions,
        diff_text = diff.diff_text,
    )
}
