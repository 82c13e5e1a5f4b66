use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{AdapterError, AdapterErrorKind};
use crate::host::CapabilityHost;

#[async_trait]
pub trait CdpTransport: Send + Sync {
    async fn send_command(&self, method: &str, params: Value) -> Result<Value, AdapterError>;
}

#[derive(Default)]
pub struct NoopTransport;

#[async_trait]
impl CdpTransport for NoopTransport {
    async fn send_command(&self, method: &str, _params: Value) -> Result<Value, AdapterError> {
        Err(AdapterError::new(AdapterErrorKind::Internal)
            .with_hint(format!("transport not available for method {method}")))
    }
}

/// Forwards protocol calls through the resolved bridge capability.
#[derive(Clone)]
pub struct BridgeTransport {
    host: Arc<dyn CapabilityHost>,
    capability: String,
}

impl BridgeTransport {
    pub fn new(host: Arc<dyn CapabilityHost>, capability: impl Into<String>) -> Self {
        Self {
            host,
            capability: capability.into(),
        }
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }
}

#[async_trait]
impl CdpTransport for BridgeTransport {
    async fn send_command(&self, method: &str, params: Value) -> Result<Value, AdapterError> {
        debug!(target: "cdp-bridge", capability = %self.capability, method, "forwarding");
        let raw = self
            .host
            .invoke(
                &self.capability,
                json!({ "method": method, "params": params }),
            )
            .await?;
        unwrap_capability_result(method, raw)
    }
}

/// Strip the tool-call envelope off a capability result.
///
/// Prefers `structuredContent`, then the first text item of `content` (parsed as JSON
/// when possible), then the raw result. `isError: true` is surfaced as a protocol error.
pub fn unwrap_capability_result(method: &str, raw: Value) -> Result<Value, AdapterError> {
    let first_text = raw
        .get("content")
        .and_then(Value::as_array)
        .and_then(|items| {
            items.iter().find_map(|item| {
                let is_text = item
                    .get("type")
                    .and_then(Value::as_str)
                    .map(|kind| kind == "text")
                    .unwrap_or(true);
                if is_text {
                    item.get("text").and_then(Value::as_str)
                } else {
                    None
                }
            })
        })
        .map(str::to_string);

    if raw.get("isError").and_then(Value::as_bool) == Some(true) {
        return Err(AdapterError::new(AdapterErrorKind::ProtocolError)
            .with_hint(format!(
                "{method}: {}",
                first_text.as_deref().unwrap_or("capability reported an error")
            ))
            .with_data(raw));
    }

    if let Some(structured) = raw.get("structuredContent") {
        return Ok(structured.clone());
    }

    if let Some(text) = first_text {
        return Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)));
    }

    Ok(raw)
}
