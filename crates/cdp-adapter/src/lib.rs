//! SoulBrowser DevTools bridge.
//!
//! The breakpoint tooling never talks to Chromium directly. Protocol calls are forwarded
//! through a remotely exposed capability (typically an MCP tool such as
//! `chrome-devtools:call_cdp`). This crate finds that capability, wraps it in a
//! [`transport::CdpTransport`], and exposes the handful of protocol operations the
//! breakpoint flow needs through the [`Cdp`] trait.

pub mod adapter;
pub mod capability;
pub mod commands;
pub mod host;
pub mod mcp;
pub mod transport;

pub mod error {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use thiserror::Error;

    /// High-level error categories surfaced by the bridge.
    #[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
    pub enum AdapterErrorKind {
        #[error("no bridge capability discovered")]
        DiscoveryFailed,
        #[error("capability i/o failure")]
        CapabilityIo,
        #[error("protocol call failed")]
        ProtocolError,
        #[error("invalid protocol response")]
        InvalidResponse,
        #[error("invalid input")]
        InvalidInput,
        #[error("call timed out")]
        Timeout,
        #[error("internal error")]
        Internal,
    }

    /// Enriched error metadata passed back to higher layers.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct AdapterError {
        pub kind: AdapterErrorKind,
        pub hint: Option<String>,
        pub retriable: bool,
        pub data: Option<serde_json::Value>,
    }

    impl fmt::Display for AdapterError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.kind)?;
            if let Some(hint) = &self.hint {
                write!(f, ": {}", hint)?;
            }
            Ok(())
        }
    }

    impl std::error::Error for AdapterError {}

    impl AdapterError {
        pub fn new(kind: AdapterErrorKind) -> Self {
            Self {
                kind,
                hint: None,
                retriable: false,
                data: None,
            }
        }

        pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
            self.hint = Some(hint.into());
            self
        }

        pub fn retriable(mut self, flag: bool) -> Self {
            self.retriable = flag;
            self
        }

        pub fn with_data(mut self, data: serde_json::Value) -> Self {
            self.data = Some(data);
            self
        }
    }
}

pub mod config {
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// How to reach the process exposing the DevTools bridge capability.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(default)]
    pub struct BridgeConfig {
        /// Executable of the MCP server exposing the bridge capability.
        pub command: Option<String>,
        pub args: Vec<String>,
        pub env: HashMap<String, String>,
        pub cwd: Option<PathBuf>,
        /// Explicit capability name; skips heuristic discovery when set.
        pub capability: Option<String>,
        pub call_timeout_ms: u64,
    }

    impl Default for BridgeConfig {
        fn default() -> Self {
            Self {
                command: None,
                args: Vec::new(),
                env: HashMap::new(),
                cwd: None,
                capability: None,
                call_timeout_ms: 30_000,
            }
        }
    }
}

pub use adapter::{discover_bridge, Cdp, CdpBridgeAdapter, DiscoveredBridge};
pub use capability::{resolve_bridge_capability, summarize_capabilities, RemoteCapability};
pub use config::BridgeConfig;
pub use error::{AdapterError, AdapterErrorKind};
pub use host::CapabilityHost;
pub use mcp::McpStdioHost;
pub use transport::{BridgeTransport, CdpTransport, NoopTransport};
