//! Breakpoint planning primitives.
//!
//! Holds the two-variant breakpoint plan, the validator that turns untrusted planner
//! output into one, and the planner seam plus prompt templates used by LLM backends.

pub mod errors;
pub mod plan;
pub mod plan_validator;
pub mod planner;
pub mod prompt;

pub use errors::AgentError;
pub use plan::{BreakpointPlan, PlanTarget, DEFAULT_EVENT_TYPE};
pub use plan_validator::{validate_plan, PlanValidationError, PlanValidator};
pub use planner::{BreakpointPlanner, PlanRequest, StaticPlanner};
pub use prompt::PromptBuilder;
