use thiserror::Error;

/// Errors emitted by the agent-core crate.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Raised when a planning request is malformed or missing required fields.
    #[error("invalid planning request: {0}")]
    InvalidRequest(String),

    /// Raised when the planner backend fails or answers with something unusable.
    #[error("planner failed: {0}")]
    Planner(String),
}

impl AgentError {
    /// Helper for wrapping static string errors.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Helper for planner backend failures.
    pub fn planner(message: impl Into<String>) -> Self {
        Self::Planner(message.into())
    }
}
