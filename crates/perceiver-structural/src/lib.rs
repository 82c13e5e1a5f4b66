//! Structural perception for the breakpoint flow: turns the untyped document tree
//! returned by the DevTools bridge into a bounded, indented outline a planner can read.

pub mod errors;
pub mod model;
pub mod outline;
pub mod policy;
pub mod ports;
pub mod structural;

pub use errors::PerceiverError;
pub use model::NodeView;
pub use outline::{resolve_root, summarize, summarize_with};
pub use policy::OutlineLimits;
pub use ports::{AdapterPort, DocumentPort};
pub use structural::{CapturedOutline, OutlineCapture, OUTLINE_PLACEHOLDER};
