use std::sync::Arc;

use async_trait::async_trait;
use cdp_adapter::Cdp;
use serde_json::Value;

use crate::errors::PerceiverError;

/// Source of the raw document tree.
#[async_trait]
pub trait DocumentPort: Send + Sync {
    async fn fetch_document(&self) -> Result<Value, PerceiverError>;
}

pub struct AdapterPort<C>
where
    C: Cdp + ?Sized,
{
    adapter: Arc<C>,
}

impl<C> AdapterPort<C>
where
    C: Cdp + ?Sized,
{
    pub fn new(adapter: Arc<C>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl<C> DocumentPort for AdapterPort<C>
where
    C: Cdp + ?Sized,
{
    async fn fetch_document(&self) -> Result<Value, PerceiverError> {
        self.adapter
            .get_document()
            .await
            .map_err(|err| PerceiverError::DocumentFetch(err.to_string()))
    }
}
