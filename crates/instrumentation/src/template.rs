//! Single-pass `{{name}}` substitution.
//!
//! Substituted values are never rescanned, so a bound value that itself contains
//! `{{...}}` is emitted verbatim.

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

pub(crate) fn render(template: &str, bindings: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match bindings.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
        }
        rest = &after[end + CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_names_once() {
        let out = render(
            "a={{a}}; b={{b}}; c={{c}}",
            &[("a", "\"{{b}}\"".to_string()), ("b", "2".to_string())],
        );
        assert_eq!(out, "a=\"{{b}}\"; b=2; c={{c}}");
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        assert_eq!(render("x {{oops", &[]), "x {{oops");
    }
}
