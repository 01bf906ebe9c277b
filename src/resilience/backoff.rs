//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 || base_ms == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Sleep before retry `attempt` according to `config`.
pub async fn wait_before_retry(attempt: u32, config: &RetryConfig) {
    let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
    if !delay.is_zero() {
        tracing::debug!(attempt, delay = ?delay, "Backing off before retry");
        tokio::time::sleep(delay).await;
    }
}
