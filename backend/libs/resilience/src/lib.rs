//! Retry support for transient failures.
//!
//! The ledgers run their transactions through [`with_retry`], treating
//! optimistic-commit conflicts as transient: bounded attempts with
//! exponential backoff and jitter, then the last error is surfaced
//! unchanged.

pub mod retry;

pub use retry::{with_retry, RetryConfig};
