//! Retry logic with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::errors::{ClientError, ClientResult};

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Initial backoff delay.
    pub initial_backoff: Duration,
    /// Maximum delay between two attempts.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
    /// Jitter factor (0.0 to 1.0).
    pub jitter: f64,
    /// Ceiling on the total time spent on one operation, retries included.
    pub max_elapsed: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: 0.1,
            max_elapsed: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Backoff schedule for a single logical operation.
///
/// Delays never decrease from one retry to the next, and no delay is handed
/// out that would push the operation past `max_elapsed`.
#[derive(Debug)]
pub struct Backoff<'a> {
    config: &'a RetryConfig,
    retries: u32,
    previous: Duration,
    started: Instant,
}

impl<'a> Backoff<'a> {
    /// Starts a new schedule.
    pub fn new(config: &'a RetryConfig) -> Self {
        Self {
            config,
            retries: 0,
            previous: Duration::ZERO,
            started: Instant::now(),
        }
    }

    /// Number of retries handed out so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the delay before the next retry, or `None` once the retry
    /// count or the elapsed-time budget is exhausted.
    pub fn next_delay(&mut self, server_retry_after: Option<Duration>) -> Option<Duration> {
        if self.retries >= self.config.max_retries {
            return None;
        }

        let delay = server_retry_after
            .unwrap_or_else(|| self.calculate_backoff(self.retries))
            .max(self.previous);

        if self.started.elapsed() + delay > self.config.max_elapsed {
            return None;
        }

        self.retries += 1;
        self.previous = delay;
        Some(delay)
    }

    /// Exponential delay for the given retry index, capped and jittered.
    fn calculate_backoff(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let base_delay =
            self.config.initial_backoff.as_secs_f64() * self.config.backoff_multiplier.powi(exponent);

        let capped_delay = base_delay.min(self.config.max_backoff.as_secs_f64());

        let jitter_range = capped_delay * self.config.jitter.clamp(0.0, 1.0);
        let jitter = (rand::random::<f64>() * 2.0 - 1.0) * jitter_range;
        let final_delay = (capped_delay + jitter).max(0.0);

        Duration::from_secs_f64(final_delay)
    }
}

/// Retry executor with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Creates a new retry executor.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the retry policy.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Executes an operation, retrying errors for which
    /// [`ClientError::is_retryable`] holds.
    ///
    /// The last error is returned unchanged once the budget runs out.
    pub async fn execute<F, Fut, T>(&self, operation: &str, f: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        self.execute_if(operation, f, ClientError::is_retryable).await
    }

    /// Executes an operation, retrying only errors accepted by `should_retry`.
    pub async fn execute_if<F, Fut, T, P>(
        &self,
        operation: &str,
        mut f: F,
        should_retry: P,
    ) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
        P: Fn(&ClientError) -> bool,
    {
        let mut backoff = Backoff::new(&self.config);

        loop {
            let error = match f().await {
                Ok(result) => return Ok(result),
                Err(error) => error,
            };

            if !should_retry(&error) {
                return Err(error);
            }

            let Some(delay) = backoff.next_delay(error.retry_after()) else {
                debug!(
                    operation,
                    retries = backoff.retries(),
                    "Retry budget exhausted"
                );
                return Err(error);
            };

            warn!(
                operation,
                attempt = backoff.retries(),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Retrying after transient failure"
            );

            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
