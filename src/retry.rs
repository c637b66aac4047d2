//! A bounded retry policy with exponential backoff.
//!
//! The policy is decoupled from any particular request so the backoff
//! schedule can be tested without a network. An operation is retried while
//! attempts remain and the error is classified retryable; a success is never
//! retried, so a failure that happens *after* a successful response (e.g.
//! parsing its body) must be raised outside the retried operation.

use std::{future::Future, time::Duration};

/// Maximum attempts and delay schedule for a retried operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// How many times a failed operation is reattempted after the first try.
    pub max_retries: u32,
    /// Delay before the first reattempt. Doubles after every reattempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    /// Runs `operation` until it succeeds, a non-retryable error occurs, or
    /// the attempt budget is exhausted. The last error is returned verbatim.
    pub(crate) async fn run<T, E, F, Fut>(
        &self,
        mut operation: F,
        is_retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retries_left = self.max_retries;
        let mut delay = self.base_delay;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if retries_left > 0 && is_retryable(&error) => {
                    retries_left -= 1;
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
