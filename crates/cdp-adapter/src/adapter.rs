use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::capability::{resolve_bridge_capability, RemoteCapability};
use crate::commands::{
    EvaluateParams, GetDocumentParams, NavigateParams, ENABLED_DOMAINS, EVALUATE, GET_DOCUMENT,
    NAVIGATE,
};
use crate::error::{AdapterError, AdapterErrorKind};
use crate::host::CapabilityHost;
use crate::transport::{BridgeTransport, CdpTransport};

/// Protocol operations the breakpoint flow issues against the inspected page.
#[async_trait]
pub trait Cdp: Send + Sync {
    async fn enable_domains(&self) -> Result<(), AdapterError>;
    async fn navigate(&self, url: &str) -> Result<(), AdapterError>;
    async fn get_document(&self) -> Result<Value, AdapterError>;
    /// Evaluates `expression` in the page's global scope and returns the by-value result.
    async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError>;
}

pub struct CdpBridgeAdapter {
    transport: Arc<dyn CdpTransport>,
    capability: String,
}

impl CdpBridgeAdapter {
    pub fn with_transport(transport: Arc<dyn CdpTransport>, capability: impl Into<String>) -> Self {
        Self {
            transport,
            capability: capability.into(),
        }
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }

    async fn send(&self, method: &str, params: impl serde::Serialize) -> Result<Value, AdapterError> {
        let params = serde_json::to_value(params).map_err(|err| {
            AdapterError::new(AdapterErrorKind::Internal).with_hint(err.to_string())
        })?;
        self.transport.send_command(method, params).await
    }
}

#[async_trait]
impl Cdp for CdpBridgeAdapter {
    async fn enable_domains(&self) -> Result<(), AdapterError> {
        let mut failed = Vec::new();
        for method in ENABLED_DOMAINS {
            if let Err(err) = self.send(method, serde_json::json!({})).await {
                warn!(target: "cdp-bridge", method, %err, "domain enable failed");
                failed.push(method);
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(AdapterError::new(AdapterErrorKind::ProtocolError)
                .with_hint(format!("failed to enable {}", failed.join(", "))))
        }
    }

    async fn navigate(&self, url: &str) -> Result<(), AdapterError> {
        let parsed = Url::parse(url).map_err(|err| {
            AdapterError::new(AdapterErrorKind::InvalidInput)
                .with_hint(format!("invalid url '{url}': {err}"))
        })?;
        let response = self
            .send(
                NAVIGATE,
                NavigateParams {
                    url: parsed.to_string(),
                },
            )
            .await?;
        if let Some(error_text) = response.get("errorText").and_then(Value::as_str) {
            return Err(AdapterError::new(AdapterErrorKind::ProtocolError)
                .with_hint(format!("navigation to {parsed} failed: {error_text}")));
        }
        info!(target: "cdp-bridge", url = %parsed, "navigated");
        Ok(())
    }

    async fn get_document(&self) -> Result<Value, AdapterError> {
        self.send(GET_DOCUMENT, GetDocumentParams::default()).await
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError> {
        let response = self.send(EVALUATE, EvaluateParams::new(expression)).await?;
        if let Some(details) = response.get("exceptionDetails") {
            let text = details
                .get("exception")
                .and_then(|exc| exc.get("description"))
                .or_else(|| details.get("text"))
                .and_then(Value::as_str)
                .unwrap_or("evaluation threw")
                .to_string();
            return Err(AdapterError::new(AdapterErrorKind::ProtocolError)
                .with_hint(text)
                .with_data(details.clone()));
        }
        let result = response.get("result").ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::InvalidResponse)
                .with_hint("Runtime.evaluate response missing result")
                .with_data(response.clone())
        })?;
        debug!(target: "cdp-bridge", kind = ?result.get("type"), "evaluated");
        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }
}

/// Outcome of a discovery attempt: the bound adapter plus the capability snapshot.
pub struct DiscoveredBridge {
    pub adapter: CdpBridgeAdapter,
    pub capabilities: Vec<RemoteCapability>,
}

/// List the host's capabilities, resolve the bridge, and bind an adapter to it.
///
/// A listing failure only degrades discovery (an explicit override still succeeds);
/// finding no bridge at all is fatal.
pub async fn discover_bridge(
    host: Arc<dyn CapabilityHost>,
    explicit_override: Option<&str>,
) -> Result<DiscoveredBridge, AdapterError> {
    let capabilities = match host.list_capabilities().await {
        Ok(list) => list,
        Err(err) => {
            warn!(target: "cdp-bridge", %err, "capability listing failed; continuing without it");
            Vec::new()
        }
    };

    let capability = resolve_bridge_capability(&capabilities, explicit_override).ok_or_else(|| {
        AdapterError::new(AdapterErrorKind::DiscoveryFailed).with_hint(format!(
            "none of {} listed capabilities forwards protocol calls; configure bridge.capability",
            capabilities.len()
        ))
    })?;
    info!(target: "cdp-bridge", %capability, "bridge capability resolved");

    let transport: Arc<dyn CdpTransport> = Arc::new(BridgeTransport::new(host, capability.clone()));
    Ok(DiscoveredBridge {
        adapter: CdpBridgeAdapter::with_transport(transport, capability),
        capabilities,
    })
}
