//! JSON extraction from free-form LLM responses.
//!
//! Providers often wrap JSON in markdown fences or surround it with prose.

/// Extract the first JSON object from an LLM response.
///
/// Tries, in order:
/// 1. A ` ```json ` fenced block
/// 2. A bare ` ``` ` fenced block whose content starts with `{`
/// 3. The first `{` that starts a parseable object in the surrounding text
///
/// Returns `None` when the response contains no JSON object.
pub fn extract_json(response: &str) -> Option<String> {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json")
        && let Some(end) = trimmed[start + 7..].find("```")
    {
        let inner = trimmed[start + 7..start + 7 + end].trim();
        if inner.starts_with('{') {
            return Some(inner.to_string());
        }
    }

    if let Some(start) = trimmed.find("```")
        && let Some(end) = trimmed[start + 3..].find("```")
    {
        let inner = trimmed[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return Some(inner.to_string());
        }
    }

    find_valid_json_object(trimmed)
}

/// Try every `{` as the start of an object: a streaming `serde_json` parse
/// first, then balanced-brace extraction validated by a full parse.
fn find_valid_json_object(text: &str) -> Option<String> {
    for (start_idx, _) in text.match_indices('{') {
        let candidate = &text[start_idx..];

        let mut stream =
            serde_json::Deserializer::from_str(candidate).into_iter::<serde_json::Value>();
        if let Some(Ok(value)) = stream.next()
            && value.is_object()
        {
            return Some(value.to_string());
        }

        if let Some(json_str) = extract_balanced_braces(candidate)
            && serde_json::from_str::<serde_json::Value>(json_str).is_ok()
        {
            return Some(json_str.to_string());
        }
    }

    None
}

/// Slice from the first `{` to its matching `}`, skipping braces inside
/// JSON string literals.
fn extract_balanced_braces(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (idx, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(json: &str, key: &str) -> serde_json::Value {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        value[key].clone()
    }

    #[test]
    fn test_fenced_json_block() {
        let response = "Here you go:\n```json\n{\"subject\": \"fix: typo\"}\n```";
        assert_eq!(
            extract_json(response).as_deref(),
            Some(r#"{"subject": "fix: typo"}"#)
        );
    }

    #[test]
    fn test_bare_fenced_block() {
        let response = "```\n{\"subject\": \"feat: add x\", \"breaking\": false}\n```";
        let json = extract_json(response).unwrap();
        assert_eq!(field(&json, "subject"), "feat: add x");
    }

    #[test]
    fn test_object_inside_prose() {
        let response = r#"Sure! {"subject": "docs: update readme", "body": null} Let me know."#;
        let json = extract_json(response).unwrap();
        assert_eq!(field(&json, "subject"), "docs: update readme");
    }

    #[test]
    fn test_braces_inside_strings() {
        let response = r#"{"subject": "fix(fmt): escape { and } in templates"}"#;
        let json = extract_json(response).unwrap();
        assert_eq!(field(&json, "subject"), "fix(fmt): escape { and } in templates");
    }

    #[test]
    fn test_escaped_quotes() {
        let response = r#"{"body": "Handle \"quoted\" names"}"#;
        let json = extract_json(response).unwrap();
        assert!(field(&json, "body").as_str().unwrap().contains("\"quoted\""));
    }

    #[test]
    fn test_plain_text_has_no_json() {
        assert_eq!(extract_json("fix: correct off-by-one in pager"), None);
    }

    #[test]
    fn test_empty_fence_has_no_json() {
        assert_eq!(extract_json("```json\n```"), None);
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(extract_json("}} {"), None);
        assert_eq!(extract_balanced_braces("}{"), None);
    }

    #[test]
    fn test_balanced_braces_slice() {
        assert_eq!(
            extract_balanced_braces(r#"{"a": {"b": 1}} extra"#),
            Some(r#"{"a": {"b": 1}}"#)
        );
    }
}
