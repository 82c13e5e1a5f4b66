//! Renders a validated [`BreakpointPlan`] into a self-invoking page script.

use agent_core::{BreakpointPlan, PlanTarget};
use serde_json::Value;
use tracing::debug;

use crate::template;

const EVENT_LISTENER_TEMPLATE: &str = include_str!("scripts/event_listener.js");
const FUNCTION_WRAP_TEMPLATE: &str = include_str!("scripts/function_wrap.js");

/// Global object property holding event registrations keyed by `selector::eventType`.
pub const REGISTRY_GLOBAL: &str = "__soulBreakpointRegistry";
/// Property set on wrapper functions so a second wrap is a no-op.
pub const WRAPPED_MARKER: &str = "__soulBreakpointWrapped";

/// Stateless fragment generator. Every dynamic value is embedded as a JSON literal.
#[derive(Debug, Clone, Default)]
pub struct InstrumentationGenerator;

impl InstrumentationGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, plan: &BreakpointPlan, label: &str) -> String {
        let label = js_string(label);
        let notes = js_string_array(&plan.console_notes);
        let fragment = match &plan.target {
            PlanTarget::DomEvent { selector } => template::render(
                EVENT_LISTENER_TEMPLATE,
                &[
                    ("selector", js_string(selector)),
                    ("event_type", js_string(plan.effective_event_type())),
                    ("label", label),
                    ("notes", notes),
                ],
            ),
            PlanTarget::FunctionCall { function_name } => template::render(
                FUNCTION_WRAP_TEMPLATE,
                &[
                    ("function_path", js_string(function_name)),
                    ("label", label),
                    ("notes", notes),
                ],
            ),
        };
        debug!(
            target: "instrumentation",
            plan = %plan.describe(),
            bytes = fragment.len(),
            "generated instrumentation fragment"
        );
        fragment
    }
}

/// Convenience wrapper over [`InstrumentationGenerator::generate`].
pub fn generate(plan: &BreakpointPlan, label: &str) -> String {
    InstrumentationGenerator::new().generate(plan, label)
}

// JSON string literals are valid JS except for raw U+2028/U+2029 in older engines.
fn js_string(text: &str) -> String {
    escape_line_separators(Value::String(text.to_string()).to_string())
}

fn js_string_array(items: &[String]) -> String {
    let array = Value::Array(items.iter().cloned().map(Value::String).collect());
    escape_line_separators(array.to_string())
}

fn escape_line_separators(literal: String) -> String {
    if literal.contains(['\u{2028}', '\u{2029}']) {
        literal
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029")
    } else {
        literal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_fragment_embeds_selector_event_and_notes() {
        let plan = BreakpointPlan::dom_event("#save-btn").with_console_notes(["watch for race"]);
        let fragment = generate(&plan, "Save double submit");
        assert!(fragment.contains(r##"var selector = "#save-btn";"##));
        assert!(fragment.contains(r#"var eventType = "click";"#));
        assert!(fragment.contains(r#"var label = "Save double submit";"#));
        assert!(fragment.contains(r#"var notes = ["watch for race"];"#));
        assert!(fragment.contains(REGISTRY_GLOBAL));
        assert!(fragment.contains("debugger;"));
        assert!(!fragment.contains("{{"));
    }

    #[test]
    fn function_fragment_embeds_path() {
        let plan = BreakpointPlan::function_call("app.store.dispatch");
        let fragment = generate(&plan, "dispatch");
        assert!(fragment.contains(r#"var path = "app.store.dispatch";"#));
        assert!(fragment.contains(r#"var notes = [];"#));
        assert!(fragment.contains(WRAPPED_MARKER));
        assert!(!fragment.contains(REGISTRY_GLOBAL));
    }

    #[test]
    fn hostile_values_stay_inside_string_literals() {
        let plan = BreakpointPlan::dom_event("a[title=\"x\"]</script>")
            .with_event_type("click\"); alert(1); (\"")
            .with_console_notes(["line\nbreak", "{{label}}", "sep\u{2028}here"]);
        let fragment = generate(&plan, "quote \" and backslash \\");
        assert!(fragment.contains(r#"var selector = "a[title=\"x\"]</script>";"#));
        assert!(fragment.contains(r#"var eventType = "click\"); alert(1); (\"";"#));
        assert!(fragment.contains(r#"var label = "quote \" and backslash \\";"#));
        assert!(fragment.contains(r#"["line\nbreak","{{label}}","sep\u2028here"]"#));
        assert!(!fragment.contains('\u{2028}'));
    }

    #[test]
    fn generation_is_deterministic() {
        let plan = BreakpointPlan::function_call("window.save").with_console_notes(["a", "b"]);
        assert_eq!(generate(&plan, "x"), generate(&plan, "x"));
    }
}
