//! Pulling a JSON object out of a model response.
//!
//! Schema-constrained responses are normally bare JSON, but models still
//! occasionally wrap the object in a markdown fence or add a sentence of
//! preamble. Both are tolerated here before the shape is validated.

/// Returns the JSON object embedded in `response`.
///
/// Tries, in order: the whole trimmed response, the contents of a markdown
/// code fence, then the first balanced `{ ... }` span.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::extract_json_object;
///
/// let response = "Here you go:\n```json\n{\"story\": \"x\"}\n```";
/// assert_eq!(extract_json_object(response), Some("{\"story\": \"x\"}"));
/// assert_eq!(extract_json_object("no json here"), None);
/// ```
pub fn extract_json_object(response: &str) -> Option<&str> {
    let trimmed = response.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    if let Some(block) = extract_from_code_block(trimmed)
        && block.starts_with('{')
    {
        return Some(block);
    }

    extract_balanced(trimmed, '{', '}')
}

/// Contents of the first markdown code fence, with or without a language
/// tag. An unclosed fence runs to the end of the response.
fn extract_from_code_block(response: &str) -> Option<&str> {
    let start = response.find("```")? + 3;
    let body_start = response[start..]
        .find('\n')
        .map(|n| start + n + 1)
        .unwrap_or(start);
    let body = match response[body_start..].find("```") {
        Some(end) => &response[body_start..body_start + end],
        None => &response[body_start..],
    };
    Some(body.trim())
}

/// First span between `open` and its matching `close`, skipping delimiters
/// inside string literals.
fn extract_balanced(response: &str, open: char, close: char) -> Option<&str> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&response[start..start + i + ch.len_utf8()]);
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

    #[test]
    fn bare_object() {
        assert_eq!(extract_json_object("  {\"a\": 1}\n"), Some("{\"a\": 1}"));
    }

    #[test]
    fn fence_without_language() {
        let response = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(response), Some("{\"a\": 1}"));
    }

    #[test]
    fn preamble_and_trailing_text() {
        let response = "Sure! {\"a\": {\"b\": \"}\"}} Hope that helps.";
        assert_eq!(extract_json_object(response), Some("{\"a\": {\"b\": \"}\"}}"));
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let response = "x {\"a\": \"say \\\"hi\\\" {\"} y";
        assert_eq!(extract_json_object(response), Some("{\"a\": \"say \\\"hi\\\" {\"}"));
    }

    #[test]
    fn unbalanced_object_is_rejected() {
        assert_eq!(extract_json_object("text {\"a\": 1"), None);
    }
}
