//! Protocol calls issued by the breakpoint flow and their parameter shapes.

use serde::{Deserialize, Serialize};

/// Domains armed before inspection, in the order they are enabled.
pub const ENABLED_DOMAINS: [&str; 4] = [
    "Runtime.enable",
    "Debugger.enable",
    "DOM.enable",
    "Page.enable",
];

pub const NAVIGATE: &str = "Page.navigate";
pub const GET_DOCUMENT: &str = "DOM.getDocument";
pub const EVALUATE: &str = "Runtime.evaluate";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigateParams {
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetDocumentParams {
    pub depth: i32,
    pub pierce: bool,
}

impl Default for GetDocumentParams {
    fn default() -> Self {
        Self {
            depth: 2,
            pierce: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    pub expression: String,
    #[serde(rename = "includeCommandLineAPI")]
    pub include_command_line_api: bool,
    pub await_promise: bool,
    pub return_by_value: bool,
}

impl EvaluateParams {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            include_command_line_api: true,
            await_promise: false,
            return_by_value: true,
        }
    }
}
