//! One breakpoint run: discover the bridge, look at the page, ask for a plan, instrument.
//!
//! Every step is awaited in order; nothing here fans out.

use std::sync::Arc;

use agent_core::{
    AgentError, BreakpointPlan, BreakpointPlanner, PlanRequest, PlanValidationError,
    PlanValidator,
};
use cdp_adapter::{
    discover_bridge, summarize_capabilities, AdapterError, CapabilityHost, Cdp,
    CdpBridgeAdapter, RemoteCapability,
};
use perceiver_structural::{AdapterPort, CapturedOutline, OutlineCapture, OutlineLimits};
use serde::Serialize;
use soulbrowser_instrumentation::{InstrumentationGenerator, InstrumentationOutcome};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal session failures. Outline and listing problems only degrade the run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("bridge discovery failed: {0}")]
    Discovery(#[source] AdapterError),
    #[error("planner failed: {0}")]
    Planner(#[source] AgentError),
    #[error("planner returned an invalid plan: {0}")]
    PlanValidation(#[source] PlanValidationError),
    #[error("evaluating instrumentation failed: {0}")]
    Evaluation(#[source] AdapterError),
}

impl SessionError {
    pub fn label(&self) -> &'static str {
        match self {
            SessionError::Discovery(_) => "discovery",
            SessionError::Planner(_) => "planner",
            SessionError::PlanValidation(err) => err.telemetry_label(),
            SessionError::Evaluation(_) => "evaluation",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    /// Page to load before the outline is captured.
    pub url: Option<String>,
    /// Console group label; defaults to the plan explanation, then the goal.
    pub label: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub goal: String,
    pub capability: String,
    pub outline: String,
    pub outline_degraded: bool,
    pub plan: BreakpointPlan,
    pub label: String,
    pub fragment: String,
    pub outcome: InstrumentationOutcome,
}

/// A bound bridge with domains armed, shared by the run and the inspection commands.
pub struct ConnectedBridge {
    pub adapter: Arc<CdpBridgeAdapter>,
    pub capabilities: Vec<RemoteCapability>,
}

impl ConnectedBridge {
    pub fn capability(&self) -> &str {
        self.adapter.capability()
    }

    pub fn capability_summary(&self) -> String {
        summarize_capabilities(&self.capabilities)
    }

    /// Loads `url` when given. Failure is logged and the run continues on whatever page is open.
    pub async fn open(&self, url: Option<&str>) {
        let Some(url) = url else {
            return;
        };
        if let Err(err) = self.adapter.navigate(url).await {
            warn!(target: "cdp-bridge", %url, %err, "navigation failed; inspecting current page");
        }
    }

    pub async fn capture_outline(&self, limits: OutlineLimits) -> CapturedOutline {
        let port = Arc::new(AdapterPort::new(Arc::clone(&self.adapter)));
        OutlineCapture::new(port, limits).capture().await
    }
}

pub struct DebugSession {
    host: Arc<dyn CapabilityHost>,
    planner: Arc<dyn BreakpointPlanner>,
    capability_override: Option<String>,
    limits: OutlineLimits,
    validator: PlanValidator,
    generator: InstrumentationGenerator,
}

impl DebugSession {
    pub fn new(host: Arc<dyn CapabilityHost>, planner: Arc<dyn BreakpointPlanner>) -> Self {
        Self {
            host,
            planner,
            capability_override: None,
            limits: OutlineLimits::default(),
            validator: PlanValidator::new(),
            generator: InstrumentationGenerator::new(),
        }
    }

    pub fn with_capability_override(mut self, capability: Option<String>) -> Self {
        self.capability_override = capability.filter(|name| !name.trim().is_empty());
        self
    }

    pub fn with_outline_limits(mut self, limits: OutlineLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolves the bridge capability and arms the protocol domains.
    pub async fn connect(&self) -> Result<ConnectedBridge, SessionError> {
        connect_bridge(Arc::clone(&self.host), self.capability_override.as_deref()).await
    }

    pub async fn run(
        &self,
        goal: &str,
        options: &SessionOptions,
    ) -> Result<SessionReport, SessionError> {
        if goal.trim().is_empty() {
            return Err(SessionError::Planner(AgentError::invalid_request(
                "debugging goal is empty",
            )));
        }

        let bridge = self.connect().await?;
        bridge.open(options.url.as_deref()).await;
        let outline = bridge.capture_outline(self.limits).await;

        let request = PlanRequest::new(goal, bridge.capability_summary(), outline.text.clone());
        let raw_plan = self
            .planner
            .plan(&request)
            .await
            .map_err(SessionError::Planner)?;
        let plan = self.validator.validate(&raw_plan).map_err(|err| {
            warn!(target: "planner", reason = err.telemetry_label(), %err, "plan rejected");
            SessionError::PlanValidation(err)
        })?;
        info!(target: "planner", plan = %plan.describe(), "plan accepted");

        let label = session_label(options.label.as_deref(), &plan, goal);
        let fragment = self.generator.generate(&plan, &label);
        let value = bridge
            .adapter
            .evaluate(&fragment)
            .await
            .map_err(SessionError::Evaluation)?;
        let outcome = InstrumentationOutcome::from_value(&value);
        report_outcome(&outcome, &plan);

        Ok(SessionReport {
            goal: goal.to_string(),
            capability: bridge.capability().to_string(),
            outline: outline.text,
            outline_degraded: outline.degraded,
            plan,
            label,
            fragment,
            outcome,
        })
    }
}

pub async fn connect_bridge(
    host: Arc<dyn CapabilityHost>,
    capability_override: Option<&str>,
) -> Result<ConnectedBridge, SessionError> {
    let discovered = discover_bridge(host, capability_override)
        .await
        .map_err(SessionError::Discovery)?;
    let adapter = Arc::new(discovered.adapter);
    if let Err(err) = adapter.enable_domains().await {
        warn!(target: "cdp-bridge", %err, "enabling protocol domains failed; continuing");
    }
    Ok(ConnectedBridge {
        adapter,
        capabilities: discovered.capabilities,
    })
}

fn session_label(explicit: Option<&str>, plan: &BreakpointPlan, goal: &str) -> String {
    let non_blank = |text: &&str| !text.trim().is_empty();
    explicit
        .filter(non_blank)
        .or(plan.explanation.as_deref().filter(non_blank))
        .unwrap_or(goal)
        .trim()
        .to_string()
}

fn report_outcome(outcome: &InstrumentationOutcome, plan: &BreakpointPlan) {
    if outcome.is_actionable_diagnostic() {
        warn!(
            target: "instrumentation",
            status = %outcome,
            plan = %plan.describe(),
            "instrumentation did not attach; the plan does not match the page"
        );
    } else if outcome.is_idempotent_noop() {
        info!(target: "instrumentation", status = %outcome, "instrumentation already present");
    } else if let InstrumentationOutcome::Unrecognized(raw) = outcome {
        warn!(target: "instrumentation", status = %raw, "unexpected instrumentation status");
    } else {
        debug!(target: "instrumentation", status = %outcome, "instrumentation reported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_explicit_then_explanation_then_goal() {
        let plan = BreakpointPlan::dom_event("#a").with_explanation("double submit");
        assert_eq!(session_label(Some("mine"), &plan, "goal"), "mine");
        assert_eq!(session_label(Some("  "), &plan, "goal"), "double submit");
        let bare = BreakpointPlan::dom_event("#a");
        assert_eq!(session_label(None, &bare, " the goal "), "the goal");
    }

    #[test]
    fn validation_errors_keep_their_telemetry_label() {
        let err = SessionError::PlanValidation(PlanValidationError::MissingTargetType);
        assert_eq!(err.label(), "plan_missing_target_type");
        assert!(err.to_string().starts_with("planner returned an invalid plan"));
    }
}
