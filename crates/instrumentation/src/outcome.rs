use std::fmt;

use serde::{Serialize, Serializer};

/// Status reported by an evaluated fragment.
///
/// None of these are failures of the session. The three mismatch statuses are surfaced
/// to the operator so the plan or the page can be corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentationOutcome {
    AlreadyRegistered,
    SelectorNotFound,
    InstrumentationAttached,
    InvalidPath,
    MissingPathSegment,
    NotAFunction,
    AlreadyWrapped,
    WrappedFunction,
    /// Anything else the page returned, kept verbatim.
    Unrecognized(String),
}

impl InstrumentationOutcome {
    pub fn from_status(status: &str) -> Self {
        match status.trim() {
            "already registered" => Self::AlreadyRegistered,
            "selector not found" => Self::SelectorNotFound,
            "instrumentation attached" => Self::InstrumentationAttached,
            "invalid path" => Self::InvalidPath,
            "missing path segment" => Self::MissingPathSegment,
            "not a function" => Self::NotAFunction,
            "already wrapped" => Self::AlreadyWrapped,
            "wrapped function" => Self::WrappedFunction,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Builds an outcome from the value `Runtime.evaluate` handed back.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(status) => Self::from_status(status),
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::AlreadyRegistered => "already registered",
            Self::SelectorNotFound => "selector not found",
            Self::InstrumentationAttached => "instrumentation attached",
            Self::InvalidPath => "invalid path",
            Self::MissingPathSegment => "missing path segment",
            Self::NotAFunction => "not a function",
            Self::AlreadyWrapped => "already wrapped",
            Self::WrappedFunction => "wrapped function",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Planner/DOM mismatch the operator should act on.
    pub fn is_actionable_diagnostic(&self) -> bool {
        matches!(
            self,
            Self::SelectorNotFound | Self::MissingPathSegment | Self::NotAFunction
        )
    }

    pub fn is_idempotent_noop(&self) -> bool {
        matches!(self, Self::AlreadyRegistered | Self::AlreadyWrapped)
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, Self::InstrumentationAttached | Self::WrappedFunction)
    }
}

impl fmt::Display for InstrumentationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InstrumentationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
