use async_trait::async_trait;
use serde_json::Value;

use crate::capability::RemoteCapability;
use crate::error::AdapterError;

/// A remote host exposing named capabilities (an MCP server in practice).
#[async_trait]
pub trait CapabilityHost: Send + Sync {
    async fn list_capabilities(&self) -> Result<Vec<RemoteCapability>, AdapterError>;

    async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, AdapterError>;
}
