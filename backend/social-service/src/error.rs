/// Error types for the social ledgers.
use doc_store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("post not found: {0}")]
    PostNotFound(Uuid),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An optimistic transaction kept conflicting with concurrent
    /// writers for the whole retry budget.
    #[error("transaction conflict persisted after {attempts} attempts")]
    Conflict { attempts: u32 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// True for the transient conflict the retry loop may absorb, as
    /// opposed to [`ServiceError::Conflict`], which is terminal.
    pub(crate) fn is_transient_conflict(&self) -> bool {
        matches!(self, ServiceError::Store(StoreError::Conflict))
    }
}

/// Result type alias for ledger operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
