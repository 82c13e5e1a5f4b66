//! Instrumentation fragments for breakpoint plans.
//!
//! A fragment is a self-invoking script evaluated in the inspected page. It attaches
//! at most once per logical target, suspends at a `debugger` statement after logging,
//! and reports what it did through a short status string instead of throwing.

pub mod generator;
pub mod outcome;
mod template;

pub use generator::{generate, InstrumentationGenerator, REGISTRY_GLOBAL, WRAPPED_MARKER};
pub use outcome::InstrumentationOutcome;
