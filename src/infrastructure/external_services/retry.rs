use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retry schedule shared by the outbound HTTP clients.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 1.5,
        }
    }
}

impl RetryPolicy {
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            backoff_factor: 1.0,
        }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis((self.backoff_factor.powi(attempt as i32 - 1) * 1000.0) as u64)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the retry budget is spent.
    pub async fn run<T, E, F, Fut>(
        &self,
        label: &str,
        is_retryable: impl Fn(&E) -> bool,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempts > self.max_retries || !is_retryable(&e) => return Err(e),
                Err(e) => {
                    let delay = self.backoff(attempts);
                    warn!(
                        "{} attempt {} failed, retrying in {:?}: {}",
                        label, attempts, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
