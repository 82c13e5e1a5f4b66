use serde::{Deserialize, Serialize};

/// Bounds applied when rendering a document outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineLimits {
    /// Depth at which recursion stops; the root sits at depth 0.
    pub max_depth: usize,
    /// Children rendered per node before the rest are summarized.
    pub max_children: usize,
}

impl Default for OutlineLimits {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_children: 12,
        }
    }
}

impl OutlineLimits {
    pub fn new(max_depth: usize, max_children: usize) -> Self {
        Self {
            max_depth,
            max_children,
        }
    }
}
