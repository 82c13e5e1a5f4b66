//! SoulBrowser breakpoints library
//!
//! Wires the bridge adapter, outline perceiver, planner, and instrumentation generator
//! into a single debugging session. Exposed for integration testing and embedding.

pub mod config;
pub mod llm;
pub mod session;

pub use config::{load_config, Config, LoadedConfig, PlannerConfig};
pub use llm::{OpenAiConfig, OpenAiPlanner};
pub use session::{
    connect_bridge, ConnectedBridge, DebugSession, SessionError, SessionOptions, SessionReport,
};
