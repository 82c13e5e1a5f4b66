//! Prompt templates handed to LLM-backed planners.

use crate::planner::PlanRequest;

pub const BREAKPOINT_SYSTEM_PROMPT: &str = r#"You are a front-end debugging assistant. Given a debugging goal, the tools available in the browser session, and an outline of the current DOM, choose ONE place to instrument so the developer can pause and inspect what happens.

Answer with a single JSON object and nothing else. Two shapes are allowed.

Instrument a DOM event on one element:
{
  "targetType": "dom-event",
  "selector": "<CSS selector matching exactly one element in the outline>",
  "eventType": "<DOM event name, default click>",
  "explanation": "<why this element/event>",
  "consoleNotes": ["<what to look at when the breakpoint hits>"]
}

Instrument calls to a global function:
{
  "targetType": "function-call",
  "functionName": "<dotted path from window, e.g. app.store.dispatch>",
  "explanation": "<why this function>",
  "consoleNotes": ["<what to look at when the breakpoint hits>"]
}

Rules:
- "selector" is required for dom-event, "functionName" is required for function-call.
- Prefer ids and stable attributes visible in the outline over positional selectors.
- Only pick function-call when the goal names or clearly implies a global function.
"#;

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn system_prompt(&self) -> &'static str {
        BREAKPOINT_SYSTEM_PROMPT
    }

    pub fn build_user_prompt(&self, request: &PlanRequest) -> String {
        format!(
            "## Debugging goal\n{goal}\n\n## Available capabilities\n{caps}\n\n## DOM outline\n```\n{outline}\n```\n\nReturn the JSON plan now.",
            goal = request.goal.trim(),
            caps = request.capability_summary.trim(),
            outline = request.dom_outline.trim_end(),
        )
    }
}
