/// Error types for feed assembly.
use doc_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Candidate fetch failed; there is no feed to serve at all.
    /// Profile or scoring failures never surface here, they degrade
    /// the feed to recency order instead.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
