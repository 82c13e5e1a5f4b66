use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::plan::{BreakpointPlan, PlanTarget, DOM_EVENT_TAG, FUNCTION_CALL_TAG};

/// Why a planner response was rejected.
///
/// `MissingTarget` means the base shape was fine but the variant's required locator is
/// absent; every other variant reports a malformed base object. All of them end the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    #[error("plan must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("plan is missing targetType (expected 'dom-event' or 'function-call')")]
    MissingTargetType,
    #[error("unknown targetType '{0}' (expected 'dom-event' or 'function-call')")]
    UnknownTargetType(String),
    #[error("field '{field}' must be {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{target_type} plan requires a non-empty '{field}'")]
    MissingTarget {
        target_type: &'static str,
        field: &'static str,
    },
}

impl PlanValidationError {
    /// True when the base shape passed but the variant's locator was absent.
    pub fn is_cross_field(&self) -> bool {
        matches!(self, PlanValidationError::MissingTarget { .. })
    }

    pub fn telemetry_label(&self) -> &'static str {
        match self {
            PlanValidationError::NotAnObject(_) => "plan_not_object",
            PlanValidationError::MissingTargetType => "plan_missing_target_type",
            PlanValidationError::UnknownTargetType(_) => "plan_unknown_target_type",
            PlanValidationError::WrongFieldType { .. } => "plan_wrong_field_type",
            PlanValidationError::MissingTarget { .. } => "plan_missing_target",
        }
    }
}

/// Checks untrusted planner output and builds a [`BreakpointPlan`].
///
/// Only defaulting is applied: `consoleNotes` becomes empty when absent, other optional
/// fields stay absent. Selectors and function paths are passed through verbatim.
#[derive(Debug, Clone, Default)]
pub struct PlanValidator;

impl PlanValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, raw: &Value) -> Result<BreakpointPlan, PlanValidationError> {
        let object = raw
            .as_object()
            .ok_or_else(|| PlanValidationError::NotAnObject(json_kind(raw)))?;

        let target_type = match object.get("targetType") {
            None | Some(Value::Null) => return Err(PlanValidationError::MissingTargetType),
            Some(Value::String(tag)) => tag.as_str(),
            Some(_) => {
                return Err(PlanValidationError::WrongFieldType {
                    field: "targetType",
                    expected: "a string",
                })
            }
        };
        if target_type != DOM_EVENT_TAG && target_type != FUNCTION_CALL_TAG {
            return Err(PlanValidationError::UnknownTargetType(
                target_type.to_string(),
            ));
        }

        let selector = optional_string(object, "selector")?;
        let function_name = optional_string(object, "functionName")?;
        let event_type = optional_string(object, "eventType")?;
        let explanation = optional_string(object, "explanation")?;
        let console_notes = string_list(object, "consoleNotes")?;

        let target = if target_type == DOM_EVENT_TAG {
            PlanTarget::DomEvent {
                selector: required(selector, DOM_EVENT_TAG, "selector")?,
            }
        } else {
            PlanTarget::FunctionCall {
                function_name: required(function_name, FUNCTION_CALL_TAG, "functionName")?,
            }
        };

        let plan = BreakpointPlan {
            target,
            event_type,
            explanation,
            console_notes,
        };
        debug!(target: "planner", plan = %plan.describe(), "plan validated");
        Ok(plan)
    }
}

/// Convenience wrapper over [`PlanValidator::validate`].
pub fn validate_plan(raw: &Value) -> Result<BreakpointPlan, PlanValidationError> {
    PlanValidator::new().validate(raw)
}

fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, PlanValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(PlanValidationError::WrongFieldType {
            field,
            expected: "a string",
        }),
    }
}

fn string_list(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, PlanValidationError> {
    let wrong = || PlanValidationError::WrongFieldType {
        field,
        expected: "an array of strings",
    };
    match object.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong))
            .collect(),
        Some(_) => Err(wrong()),
    }
}

fn required(
    value: Option<String>,
    target_type: &'static str,
    field: &'static str,
) -> Result<String, PlanValidationError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(PlanValidationError::MissingTarget { target_type, field })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
