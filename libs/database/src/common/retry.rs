use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for connection attempts made at startup
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay, in milliseconds
    pub max_delay_ms: u64,

    /// Growth factor applied after every failed attempt
    pub backoff_multiplier: f64,

    /// Scale each delay into [50%, 100%] of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 5 retries, 250ms initial delay, 5s cap, x2 growth, jitter on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Nominal delay before retry number `retry` (1-based), before jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let nominal = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        Duration::from_millis((nominal as u64).min(self.max_delay_ms))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 250,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// The last error is returned once `config.max_retries` retries have failed.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retries = 0;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(retries, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if retries >= config.max_retries {
            warn!(attempts = retries + 1, error = %err, "Giving up after repeated failures");
            return Err(err);
        }
        retries += 1;

        let mut delay = config.delay_for(retries);
        if config.use_jitter {
            delay = apply_jitter(delay);
        }

        debug!(
            retry = retries,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Operation failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

// RandomState is seeded per instance, which is enough spread for startup retries.
fn apply_jitter(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::SystemTime::now()) % 51;
    delay * percent as u32 / 100
}
