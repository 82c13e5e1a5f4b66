/// Pulls the first JSON object out of a model reply: a bare object, a fenced block,
/// or the first balanced `{...}` embedded in prose.
pub fn extract_json_object(raw: &str) -> Option<String> {
    if raw.trim_start().starts_with('{') {
        return Some(trim_symmetric(raw));
    }

    let fence = "```";
    if let Some(start) = raw.find(fence) {
        let after_fence = &raw[start + fence.len()..];
        let after_lang = after_fence.trim_start_matches(|c: char| c.is_alphanumeric() || c == '_');
        if let Some(end) = after_lang.find(fence) {
            let block = &after_lang[..end];
            if block.contains('{') {
                return Some(trim_symmetric(block));
            }
        }
    }

    balanced_object(raw)
}

// Braces inside string literals are skipped so `"a}b"` does not end the object early.
fn balanced_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let body = &raw[start..];
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in body.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(trim_symmetric(&body[..=idx]));
                }
            }
            _ => {}
        }
    }
    None
}

fn trim_symmetric(value: &str) -> String {
    value.trim().trim_matches('`').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_fenced_block() {
        let input = "Here is the plan:\n```json\n{\"targetType\":\"dom-event\"}\n```";
        let extracted = extract_json_object(input).expect("json");
        assert_eq!(extracted, "{\"targetType\":\"dom-event\"}");
    }

    #[test]
    fn extracts_from_inline_object() {
        let input = "sure { \"selector\": \"#a\" } hope that helps";
        assert_eq!(
            extract_json_object(input).as_deref(),
            Some("{ \"selector\": \"#a\" }")
        );
    }

    #[test]
    fn braces_inside_strings_do_not_close_the_object() {
        let input = r#"plan: {"selector": "div[data-x='}']", "consoleNotes": ["{"]} done"#;
        assert_eq!(
            extract_json_object(input).as_deref(),
            Some(r#"{"selector": "div[data-x='}']", "consoleNotes": ["{"]}"#)
        );
    }

    #[test]
    fn returns_none_when_missing() {
        assert!(extract_json_object("no braces").is_none());
        assert!(extract_json_object("unbalanced { \"a\": 1").is_none());
    }
}
