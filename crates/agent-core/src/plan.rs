//! Breakpoint plan produced by the planner and consumed by the instrumentation generator.

use serde::{Deserialize, Serialize};

pub const DOM_EVENT_TAG: &str = "dom-event";
pub const FUNCTION_CALL_TAG: &str = "function-call";

/// Event type used when a `dom-event` plan leaves `eventType` unset.
pub const DEFAULT_EVENT_TYPE: &str = "click";

/// What the plan instruments. The variant decides which locator field is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "targetType", rename_all = "kebab-case")]
pub enum PlanTarget {
    /// Attach a listener to the element matched by a CSS selector.
    DomEvent { selector: String },
    /// Wrap the function reachable from the global object by a dotted path.
    #[serde(rename_all = "camelCase")]
    FunctionCall { function_name: String },
}

impl PlanTarget {
    pub fn tag(&self) -> &'static str {
        match self {
            PlanTarget::DomEvent { .. } => DOM_EVENT_TAG,
            PlanTarget::FunctionCall { .. } => FUNCTION_CALL_TAG,
        }
    }
}

/// A validated plan. Immutable once produced by the validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointPlan {
    #[serde(flatten)]
    pub target: PlanTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub console_notes: Vec<String>,
}

impl BreakpointPlan {
    pub fn dom_event(selector: impl Into<String>) -> Self {
        Self::with_target(PlanTarget::DomEvent {
            selector: selector.into(),
        })
    }

    pub fn function_call(function_name: impl Into<String>) -> Self {
        Self::with_target(PlanTarget::FunctionCall {
            function_name: function_name.into(),
        })
    }

    fn with_target(target: PlanTarget) -> Self {
        Self {
            target,
            event_type: None,
            explanation: None,
            console_notes: Vec::new(),
        }
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_console_notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.console_notes = notes.into_iter().map(Into::into).collect();
        self
    }

    /// Event type to listen for, falling back to [`DEFAULT_EVENT_TYPE`].
    pub fn effective_event_type(&self) -> &str {
        self.event_type
            .as_deref()
            .filter(|event| !event.trim().is_empty())
            .unwrap_or(DEFAULT_EVENT_TYPE)
    }

    /// Short human description used in logs and reports.
    pub fn describe(&self) -> String {
        match &self.target {
            PlanTarget::DomEvent { selector } => {
                format!("{} on {}", self.effective_event_type(), selector)
            }
            PlanTarget::FunctionCall { function_name } => format!("calls to {function_name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_planner_wire_shape() {
        let plan = BreakpointPlan::dom_event("#save-btn")
            .with_event_type("click")
            .with_console_notes(["watch for race"]);
        assert_eq!(
            serde_json::to_value(&plan).expect("json"),
            json!({
                "targetType": "dom-event",
                "selector": "#save-btn",
                "eventType": "click",
                "consoleNotes": ["watch for race"],
            })
        );

        let plan = BreakpointPlan::function_call("app.store.dispatch");
        assert_eq!(
            serde_json::to_value(&plan).expect("json"),
            json!({
                "targetType": "function-call",
                "functionName": "app.store.dispatch",
                "consoleNotes": [],
            })
        );
    }

    #[test]
    fn event_type_defaults_to_click() {
        assert_eq!(BreakpointPlan::dom_event("a").effective_event_type(), "click");
        assert_eq!(
            BreakpointPlan::dom_event("a")
                .with_event_type("  ")
                .effective_event_type(),
            "click"
        );
        assert_eq!(
            BreakpointPlan::dom_event("a")
                .with_event_type("submit")
                .effective_event_type(),
            "submit"
        );
    }
}
