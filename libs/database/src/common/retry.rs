use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// How hard startup keeps knocking on a store that is not up yet.
///
/// Delays double from `initial_delay` up to `max_delay`. With jitter on,
/// each wait is a random 50%..100% of its nominal length.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(self, max_retries: u32) -> Self {
        Self { max_retries, ..self }
    }

    pub fn with_initial_delay(self, initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            ..self
        }
    }

    pub fn with_max_delay(self, max_delay: Duration) -> Self {
        Self { max_delay, ..self }
    }

    pub fn without_jitter(self) -> Self {
        Self {
            jitter: false,
            ..self
        }
    }

    /// Nominal wait before retry `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    fn wait_before(&self, retry: u32) -> Duration {
        let nominal = self.delay_for(retry);
        if self.jitter {
            nominal.mul_f64(rand::rng().random_range(0.5..=1.0))
        } else {
            nominal
        }
    }
}

/// Run `operation` until it succeeds or `config.max_retries` is spent.
///
/// The last error is returned unchanged. `label` shows up in the log lines,
/// e.g. "mongodb connect".
pub async fn retry_with_backoff<F, Fut, T, E>(
    label: &str,
    mut operation: F,
    config: RetryConfig,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retry = 0;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if retry > 0 {
                    info!(operation = label, retries = retry, "Connected after retrying");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        retry += 1;
        if retry > config.max_retries {
            warn!(operation = label, attempts = retry, error = %error, "Giving up");
            return Err(error);
        }

        let wait = config.wait_before(retry);
        warn!(
            operation = label,
            retry,
            max_retries = config.max_retries,
            wait_ms = wait.as_millis() as u64,
            error = %error,
            "Attempt failed"
        );
        tokio::time::sleep(wait).await;
    }
}
