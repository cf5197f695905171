//! Utility modules.

pub mod digest;
pub mod retry;

pub use digest::{ID_SCHEME_VERSION, short_digest};
pub use retry::{RetryConfig, RetryResult, Retryable, with_retry};
