//! Reviewing a generated commit message before committing.

use dialoguer::{Editor, Select};

/// What the user chose to do with a drafted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Edit,
    Regenerate,
    Cancel,
}

const REVIEW_CHOICES: [(&str, ReviewAction); 4] = [
    ("Commit with this message", ReviewAction::Accept),
    ("Edit message", ReviewAction::Edit),
    ("Regenerate", ReviewAction::Regenerate),
    ("Cancel", ReviewAction::Cancel),
];

const EDIT_HINT: &str =
    "\n# Lines starting with '#' are ignored. An empty message cancels the edit.\n";

/// Print the draft and ask what to do with it.
pub fn prompt_review(message: &str) -> dialoguer::Result<ReviewAction> {
    println!();
    println!("{}", indent(message));
    println!();

    let labels: Vec<&str> = REVIEW_CHOICES.iter().map(|(label, _)| *label).collect();
    let choice = Select::new()
        .with_prompt("Use this commit message?")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(choice
        .and_then(|i| REVIEW_CHOICES.get(i))
        .map(|(_, action)| *action)
        .unwrap_or(ReviewAction::Cancel))
}

/// Open `$EDITOR` on the message. Returns `None` when the edit was
/// aborted or left nothing but comments.
pub fn edit_message(message: &str) -> dialoguer::Result<Option<String>> {
    let draft = format!("{message}\n{EDIT_HINT}");
    let edited = Editor::new().extension(".gitcommit").edit(&draft)?;
    Ok(edited.as_deref().and_then(clean_edited_message))
}

/// Strip `#` comment lines and surrounding blank lines.
pub fn clean_edited_message(text: &str) -> Option<String> {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim_end)
        .collect();
    let joined = kept.join("\n");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn indent(message: &str) -> String {
    message
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
