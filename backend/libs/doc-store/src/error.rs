use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrent writer touched a document this transaction read.
    /// Safe to retry with a fresh read.
    #[error("transaction conflict")]
    Conflict,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict)
    }
}
