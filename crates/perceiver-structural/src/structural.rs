use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::PerceiverError;
use crate::outline::summarize_with;
use crate::policy::OutlineLimits;
use crate::ports::DocumentPort;

/// Stand-in outline used whenever capture fails.
pub const OUTLINE_PLACEHOLDER: &str = "(DOM outline unavailable)";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CapturedOutline {
    pub text: String,
    pub degraded: bool,
}

impl CapturedOutline {
    fn placeholder() -> Self {
        Self {
            text: OUTLINE_PLACEHOLDER.to_string(),
            degraded: true,
        }
    }
}

/// Fetches the document through a port and reduces it to an outline.
pub struct OutlineCapture<P>
where
    P: DocumentPort + ?Sized,
{
    port: Arc<P>,
    limits: OutlineLimits,
}

impl<P> OutlineCapture<P>
where
    P: DocumentPort + ?Sized,
{
    pub fn new(port: Arc<P>, limits: OutlineLimits) -> Self {
        Self { port, limits }
    }

    pub fn limits(&self) -> OutlineLimits {
        self.limits
    }

    /// Strict variant: any failure is returned to the caller.
    pub async fn try_capture(&self) -> Result<String, PerceiverError> {
        let payload = self.port.fetch_document().await?;
        summarize_with(&payload, &self.limits).ok_or(PerceiverError::NoRoot)
    }

    /// Never fails; degrades to [`OUTLINE_PLACEHOLDER`].
    pub async fn capture(&self) -> CapturedOutline {
        match self.try_capture().await {
            Ok(text) => {
                debug!(target: "outline", lines = text.lines().count(), "outline captured");
                CapturedOutline {
                    text,
                    degraded: false,
                }
            }
            Err(err) => {
                warn!(target: "outline", %err, "outline capture failed; using placeholder");
                CapturedOutline::placeholder()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cdp_adapter::{CdpBridgeAdapter, NoopTransport};
    use serde_json::{json, Value};

    use crate::ports::AdapterPort;

    struct FixedPort(Value);

    #[async_trait]
    impl DocumentPort for FixedPort {
        async fn fetch_document(&self) -> Result<Value, PerceiverError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn captures_with_configured_limits() {
        let port = Arc::new(FixedPort(json!({
            "root": {
                "nodeName": "#document",
                "children": [{ "nodeName": "HTML" }, { "nodeName": "HTML" }]
            }
        })));
        let capture = OutlineCapture::new(port, OutlineLimits::new(3, 1));
        let outline = capture.capture().await;
        assert!(!outline.degraded);
        assert_eq!(
            outline.text,
            "<#document>\n  <html>\n  … (1 more children omitted)"
        );
    }

    #[tokio::test]
    async fn non_object_payload_degrades() {
        let capture = OutlineCapture::new(Arc::new(FixedPort(json!("oops"))), OutlineLimits::default());
        assert!(matches!(
            capture.try_capture().await,
            Err(PerceiverError::NoRoot)
        ));
        let outline = capture.capture().await;
        assert!(outline.degraded);
        assert_eq!(outline.text, OUTLINE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn transport_failure_degrades() {
        let adapter = Arc::new(CdpBridgeAdapter::with_transport(
            Arc::new(NoopTransport),
            "unbound",
        ));
        let capture = OutlineCapture::new(Arc::new(AdapterPort::new(adapter)), OutlineLimits::default());
        let outline = capture.capture().await;
        assert!(outline.degraded);
        assert_eq!(outline.text, OUTLINE_PLACEHOLDER);
    }
}
