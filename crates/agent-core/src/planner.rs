use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::AgentError;

/// Everything the planner is told about the debugging session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// The operator's debugging goal, in their own words.
    pub goal: String,
    /// One line per remote capability (see `cdp_adapter::summarize_capabilities`).
    pub capability_summary: String,
    /// Bounded outline of the inspected document, or a placeholder.
    pub dom_outline: String,
}

impl PlanRequest {
    pub fn new(
        goal: impl Into<String>,
        capability_summary: impl Into<String>,
        dom_outline: impl Into<String>,
    ) -> Self {
        Self {
            goal: goal.into(),
            capability_summary: capability_summary.into(),
            dom_outline: dom_outline.into(),
        }
    }

    pub fn ensure_goal(&self) -> Result<(), AgentError> {
        if self.goal.trim().is_empty() {
            return Err(AgentError::invalid_request("debugging goal is empty"));
        }
        Ok(())
    }
}

/// External planning service. Returns the raw, unvalidated plan object.
#[async_trait]
pub trait BreakpointPlanner: Send + Sync {
    async fn plan(&self, request: &PlanRequest) -> Result<Value, AgentError>;
}

/// Planner that always answers with the same object; used for `--plan-file` runs and tests.
#[derive(Debug, Clone)]
pub struct StaticPlanner {
    plan: Value,
}

impl StaticPlanner {
    pub fn new(plan: Value) -> Self {
        Self { plan }
    }

    pub fn from_file(path: &Path) -> Result<Self, AgentError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            AgentError::invalid_request(format!("failed to read plan {}: {err}", path.display()))
        })?;
        let plan = serde_json::from_str(&text).map_err(|err| {
            AgentError::invalid_request(format!("plan {} is not JSON: {err}", path.display()))
        })?;
        Ok(Self { plan })
    }

    pub fn plan_value(&self) -> &Value {
        &self.plan
    }
}

#[async_trait]
impl BreakpointPlanner for StaticPlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Value, AgentError> {
        request.ensure_goal()?;
        debug!(target: "planner", goal = %request.goal, "answering with static plan");
        Ok(self.plan.clone())
    }
}
