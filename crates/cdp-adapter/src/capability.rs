//! Remote capability snapshot and bridge resolution.

use serde::{Deserialize, Serialize};

/// Tool names known to forward raw DevTools protocol calls.
const KNOWN_BRIDGE_TOOLS: &[&str] = &[
    "chrome-devtools:call_cdp",
    "chrome-devtools.call_cdp",
    "call_cdp",
    "cdp_call",
    "cdp.send",
    "send_cdp_command",
    "devtools_protocol_call",
];

const BRIDGE_MARKER: &str = "cdp";

/// A capability exposed by the remote host, as listed once per discovery attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCapability {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RemoteCapability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn looks_like_bridge(&self) -> bool {
        let name = self.name.to_ascii_lowercase();
        if KNOWN_BRIDGE_TOOLS.contains(&name.as_str()) || name.contains(BRIDGE_MARKER) {
            return true;
        }
        self.description
            .as_deref()
            .map(|desc| desc.to_ascii_lowercase().contains(BRIDGE_MARKER))
            .unwrap_or(false)
    }
}

/// Pick the capability that forwards protocol calls.
///
/// An explicit override wins unconditionally and is not checked against the list.
/// Otherwise the first capability (in list order) whose name is a known bridge tool,
/// or whose name or description mentions `cdp`, is returned.
pub fn resolve_bridge_capability(
    capabilities: &[RemoteCapability],
    explicit_override: Option<&str>,
) -> Option<String> {
    if let Some(name) = explicit_override {
        return Some(name.to_string());
    }
    capabilities
        .iter()
        .find(|capability| capability.looks_like_bridge())
        .map(|capability| capability.name.clone())
}

/// One line per capability, for planner prompts and CLI listings.
pub fn summarize_capabilities(capabilities: &[RemoteCapability]) -> String {
    if capabilities.is_empty() {
        return "(no capabilities listed)".to_string();
    }
    capabilities
        .iter()
        .map(|capability| match capability.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => {
                format!("- {}: {}", capability.name, desc.trim())
            }
            _ => format!("- {}", capability.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<RemoteCapability> {
        list.iter().map(|name| RemoteCapability::new(*name)).collect()
    }

    #[test]
    fn picks_known_bridge_tool() {
        let caps = names(&["foo", "chrome-devtools:call_cdp", "bar"]);
        assert_eq!(
            resolve_bridge_capability(&caps, None).as_deref(),
            Some("chrome-devtools:call_cdp")
        );
    }

    #[test]
    fn override_wins_regardless_of_list() {
        let caps = names(&["foo", "chrome-devtools:call_cdp"]);
        assert_eq!(
            resolve_bridge_capability(&caps, Some("custom-tool")).as_deref(),
            Some("custom-tool")
        );
        assert_eq!(
            resolve_bridge_capability(&[], Some("custom-tool")).as_deref(),
            Some("custom-tool")
        );
    }

    #[test]
    fn first_match_in_list_order_wins() {
        let caps = names(&["take_screenshot", "my_CDP_proxy", "call_cdp"]);
        assert_eq!(
            resolve_bridge_capability(&caps, None).as_deref(),
            Some("my_CDP_proxy")
        );
    }

    #[test]
    fn description_mention_counts() {
        let caps = vec![
            RemoteCapability::new("navigate_page").with_description("Open a URL"),
            RemoteCapability::new("raw_protocol").with_description("Send a raw CDP command"),
        ];
        assert_eq!(
            resolve_bridge_capability(&caps, None).as_deref(),
            Some("raw_protocol")
        );
    }

    #[test]
    fn nothing_matches_without_override() {
        let caps = names(&["click", "fill_form"]);
        assert_eq!(resolve_bridge_capability(&caps, None), None);
    }

    #[test]
    fn summary_lists_descriptions() {
        let caps = vec![
            RemoteCapability::new("call_cdp").with_description("  forwards protocol calls "),
            RemoteCapability::new("list_pages"),
        ];
        assert_eq!(
            summarize_capabilities(&caps),
            "- call_cdp: forwards protocol calls\n- list_pages"
        );
    }
}
