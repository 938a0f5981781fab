//! Resilience patterns for the DataCrunch client.
//!
//! Retries use exponential backoff with jitter, honour `Retry-After` hints and
//! are bounded both by a retry count and by a total elapsed-time ceiling.

mod retry;

pub use retry::{Backoff, RetryConfig, RetryExecutor};
