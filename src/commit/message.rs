//! Structured commit messages and parsing of LLM responses.

use serde::Deserialize;

use crate::llm::extract_json;

/// A parsed commit message from the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitMessage {
    pub subject: String,
    pub body: Option<String>,
    #[serde(default)]
    pub breaking: bool,
}

impl CommitMessage {
    /// Format the commit message for git.
    ///
    /// Produces:
    /// ```text
    /// type(scope): subject
    ///
    /// Body text explaining why.
    ///
    /// BREAKING CHANGE: see body
    /// ```
    /// The footer is added only when `breaking` is set and the subject does
    /// not already carry the `!` marker.
    pub fn format(&self) -> String {
        let mut parts = vec![self.subject.trim().to_string()];

        if let Some(body) = self.body.as_deref().map(str::trim)
            && !body.is_empty()
        {
            parts.push(String::new());
            parts.push(body.to_string());
        }

        if self.breaking && !self.has_bang_marker() {
            parts.push(String::new());
            parts.push("BREAKING CHANGE: see body".to_string());
        }

        parts.join("\n")
    }

    /// `feat!:` or `feat(api)!:` style subjects.
    fn has_bang_marker(&self) -> bool {
        self.subject
            .split_once(':')
            .is_some_and(|(head, _)| head.ends_with('!'))
    }
}

/// Turn a raw LLM response into final commit message text.
///
/// Uses the JSON object when one parses as a [`CommitMessage`] with a
/// non-empty subject; otherwise falls back to the trimmed raw response.
/// Returns `None` when nothing but whitespace is left.
pub fn message_from_response(response: &str) -> Option<String> {
    let parsed = extract_json(response)
        .and_then(|json| serde_json::from_str::<CommitMessage>(&json).ok())
        .filter(|msg| !msg.subject.trim().is_empty());

    let text = match parsed {
        Some(msg) => msg.format(),
        None => response.trim().to_string(),
    };

    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(subject: &str, body: Option<&str>, breaking: bool) -> CommitMessage {
        CommitMessage {
            subject: subject.to_string(),
            body: body.map(str::to_string),
            breaking,
        }
    }

    #[test]
    fn test_commit_message_format_subject_only() {
        let msg = message("feat(auth): add login endpoint", None, false);
        assert_eq!(msg.format(), "feat(auth): add login endpoint");
    }

    #[test]
    fn test_commit_message_format_with_body() {
        let msg = message(
            "fix(parser): resolve memory leak",
            Some("The parser was holding references to\nalready-freed buffers."),
            false,
        );
        assert_eq!(
            msg.format(),
            "fix(parser): resolve memory leak\n\nThe parser was holding references to\nalready-freed buffers."
        );
    }

    #[test]
    fn test_commit_message_format_empty_body() {
        let msg = message("chore: bump deps", Some("  "), false);
        assert_eq!(msg.format(), "chore: bump deps");
    }

    #[test]
    fn test_breaking_adds_footer() {
        let msg = message("feat(cli): rename --all flag", Some("Scripts must update."), true);
        assert_eq!(
            msg.format(),
            "feat(cli): rename --all flag\n\nScripts must update.\n\nBREAKING CHANGE: see body"
        );
    }

    #[test]
    fn test_breaking_with_bang_has_no_footer() {
        let msg = message("feat(api)!: drop v1 routes", None, true);
        assert_eq!(msg.format(), "feat(api)!: drop v1 routes");
    }

    #[test]
    fn test_commit_message_deserialize_no_body() {
        let json = r#"{"subject": "fix: typo", "breaking": false}"#;
        let msg: CommitMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.subject, "fix: typo");
        assert!(msg.body.is_none());
    }

    #[test]
    fn test_commit_message_deserialize_breaking_default() {
        let json = r#"{"subject": "feat: new api"}"#;
        let msg: CommitMessage = serde_json::from_str(json).unwrap();
        assert!(!msg.breaking);
    }

    #[test]
    fn test_message_from_fenced_json() {
        let response = "```json\n{\"subject\": \"fix(split): keep selection staged\", \"body\": null, \"breaking\": false}\n```";
        assert_eq!(
            message_from_response(response).as_deref(),
            Some("fix(split): keep selection staged")
        );
    }

    #[test]
    fn test_message_falls_back_to_raw_text() {
        let response = "\n  docs: explain hunk selection keys \n";
        assert_eq!(
            message_from_response(response).as_deref(),
            Some("docs: explain hunk selection keys")
        );
    }

    #[test]
    fn test_message_with_blank_subject_falls_back() {
        let response = r#"{"subject": "  ", "body": "x"}"#;
        assert_eq!(message_from_response(response).as_deref(), Some(response));
    }

    #[test]
    fn test_whitespace_response_is_none() {
        assert_eq!(message_from_response(" \n\t "), None);
    }
}
