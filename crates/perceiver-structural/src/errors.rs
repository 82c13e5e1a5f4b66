use thiserror::Error;

#[derive(Debug, Error)]
pub enum PerceiverError {
    #[error("document fetch failed: {0}")]
    DocumentFetch(String),
    #[error("document payload has no resolvable root")]
    NoRoot,
    #[error("internal error: {0}")]
    Internal(String),
}

impl PerceiverError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
