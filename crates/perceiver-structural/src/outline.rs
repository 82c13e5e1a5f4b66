//! Bounded textual outline of a document tree.
//!
//! Output format, one node per line, two spaces of indentation per depth level:
//!
//! ```text
//! <#document>
//!   <html lang="en">
//!     <body>
//!       <button id="save-btn">
//!         #text Save
//!       … (3 more children omitted)
//! ```

use serde_json::Value;

use crate::model::NodeView;
use crate::policy::OutlineLimits;

const INDENT: &str = "  ";
const TEXT_PREVIEW_CHARS: usize = 60;

/// Locate the root node: `root`, then `result.root`, then the payload itself.
///
/// Returns `None` only when the payload is not an object.
pub fn resolve_root(payload: &Value) -> Option<&Value> {
    if !payload.is_object() {
        return None;
    }
    if let Some(root) = payload.get("root").filter(|root| root.is_object()) {
        return Some(root);
    }
    if let Some(root) = payload
        .get("result")
        .and_then(|result| result.get("root"))
        .filter(|root| root.is_object())
    {
        return Some(root);
    }
    Some(payload)
}

/// Render `payload` as an outline, stopping at `max_depth` and showing at most
/// `max_children` children per node.
pub fn summarize(payload: &Value, max_depth: usize, max_children: usize) -> Option<String> {
    summarize_with(payload, &OutlineLimits::new(max_depth, max_children))
}

pub fn summarize_with(payload: &Value, limits: &OutlineLimits) -> Option<String> {
    let root = resolve_root(payload)?;
    let mut lines = Vec::new();
    render_node(root, 0, limits, &mut lines);
    Some(lines.join("\n"))
}

fn render_node(node: &Value, depth: usize, limits: &OutlineLimits, lines: &mut Vec<String>) {
    let Some(view) = NodeView::from_value(node) else {
        return;
    };
    let Some(name) = view.node_name() else {
        return;
    };
    let indent = INDENT.repeat(depth);

    if view.is_text() {
        let text = view.node_value().map(str::trim).unwrap_or_default();
        if !text.is_empty() {
            let preview: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
            lines.push(format!("{indent}#text {preview}"));
        }
        return;
    }

    lines.push(format!("{indent}{}", render_tag(name, &view.attributes())));

    let children = view.children();
    if children.is_empty() {
        return;
    }
    let child_indent = INDENT.repeat(depth + 1);

    if depth >= limits.max_depth {
        lines.push(format!(
            "{child_indent}… ({} children omitted)",
            children.len()
        ));
        return;
    }

    for child in children.iter().take(limits.max_children) {
        render_node(child, depth + 1, limits, lines);
    }
    if children.len() > limits.max_children {
        lines.push(format!(
            "{child_indent}… ({} more children omitted)",
            children.len() - limits.max_children
        ));
    }
}

fn render_tag(name: &str, attributes: &[(String, String)]) -> String {
    let mut tag = format!("<{}", name.to_lowercase());
    for (key, value) in attributes {
        tag.push_str(&format!(" {key}=\"{}\"", escape_attribute(value)));
    }
    tag.push('>');
    tag
}

/// Backslash-escape `\` and `"` so each value stays inside its quotes.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(name: &str, children: Vec<Value>) -> Value {
        json!({ "nodeName": name, "children": children })
    }

    fn text(value: &str) -> Value {
        json!({ "nodeName": "#text", "nodeValue": value })
    }

    #[test]
    fn renders_nested_elements_with_attributes() {
        let payload = json!({
            "root": {
                "nodeName": "#document",
                "children": [{
                    "nodeName": "HTML",
                    "attributes": ["lang", "en"],
                    "children": [{
                        "nodeName": "BUTTON",
                        "attributes": ["id", "save-btn", "class", "primary"],
                        "children": [text("  Save  ")]
                    }]
                }]
            }
        });
        let outline = summarize(&payload, 5, 10).expect("outline");
        assert_eq!(
            outline,
            "<#document>\n  <html lang=\"en\">\n    <button id=\"save-btn\" class=\"primary\">\n      #text Save"
        );
    }

    #[test]
    fn root_resolution_order() {
        let wrapped = json!({ "result": { "root": element("A", vec![]) } });
        assert_eq!(summarize(&wrapped, 2, 2).as_deref(), Some("<a>"));

        let both = json!({ "root": element("B", vec![]), "result": { "root": element("A", vec![]) } });
        assert_eq!(summarize(&both, 2, 2).as_deref(), Some("<b>"));

        let bare = element("DIV", vec![]);
        assert_eq!(summarize(&bare, 2, 2).as_deref(), Some("<div>"));

        let not_object_root = json!({ "root": "nope", "nodeName": "SPAN" });
        assert_eq!(summarize(&not_object_root, 2, 2).as_deref(), Some("<span>"));
    }

    #[test]
    fn non_object_payload_is_absent() {
        assert!(summarize(&json!([1, 2]), 3, 3).is_none());
        assert!(summarize(&json!("html"), 3, 3).is_none());
        assert!(summarize(&Value::Null, 3, 3).is_none());
    }

    #[test]
    fn whitespace_text_emits_nothing() {
        let payload = element("P", vec![text("   \n\t "), text(""), json!({ "nodeName": "#text" })]);
        assert_eq!(summarize(&payload, 3, 10).as_deref(), Some("<p>"));
    }

    #[test]
    fn text_is_truncated_to_sixty_characters() {
        let long = "x".repeat(80);
        let payload = element("P", vec![text(&long)]);
        let outline = summarize(&payload, 3, 10).expect("outline");
        let line = outline.lines().nth(1).expect("text line");
        assert_eq!(line, format!("  #text {}", "x".repeat(60)));
    }

    #[test]
    fn multibyte_text_truncates_on_characters() {
        let payload = element("P", vec![text(&"é".repeat(70))]);
        let outline = summarize(&payload, 3, 10).expect("outline");
        assert!(outline.ends_with(&"é".repeat(60)));
    }

    #[test]
    fn depth_limit_reports_all_children_omitted() {
        let payload = element(
            "DIV",
            vec![element("SECTION", vec![element("A", vec![]), element("B", vec![]), text("hi")])],
        );
        let outline = summarize(&payload, 1, 10).expect("outline");
        assert_eq!(
            outline,
            "<div>\n  <section>\n    … (3 children omitted)"
        );
    }

    #[test]
    fn depth_zero_renders_only_the_root() {
        let payload = element("UL", vec![element("LI", vec![])]);
        assert_eq!(
            summarize(&payload, 0, 10).as_deref(),
            Some("<ul>\n  … (1 children omitted)")
        );
    }

    #[test]
    fn width_limit_reports_remaining_children() {
        let items: Vec<Value> = (0..5).map(|_| element("LI", vec![])).collect();
        let payload = element("UL", items);
        let outline = summarize(&payload, 3, 2).expect("outline");
        assert_eq!(
            outline,
            "<ul>\n  <li>\n  <li>\n  … (3 more children omitted)"
        );
    }

    #[test]
    fn quotes_in_attribute_values_are_escaped() {
        let payload = json!({
            "nodeName": "INPUT",
            "attributes": ["value", "say \"hi\" x=\"1", "data-path", "C:\\tmp"]
        });
        assert_eq!(
            summarize(&payload, 2, 2).as_deref(),
            Some(r#"<input value="say \"hi\" x=\"1" data-path="C:\\tmp">"#)
        );
    }

    #[test]
    fn malformed_children_are_skipped() {
        let payload = element(
            "DIV",
            vec![json!(42), json!({ "attributes": ["id", "x"] }), element("SPAN", vec![])],
        );
        assert_eq!(
            summarize(&payload, 3, 10).as_deref(),
            Some("<div>\n  <span>")
        );
    }
}
