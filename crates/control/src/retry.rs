//! Retry configuration for the optimistic controllers
//!
//! A stale conditional write triggers a full re-read and retry. By default
//! the loop is unbounded: under a store that lets at least one writer win
//! per round, every caller eventually
//! succeeds, though fairness is not guaranteed and sustained contention
//! risks livelock. Production deployments can bound the loop with
//! [`RetryConfig::bounded`] and add exponential backoff; cancellation
//! always stops the loop regardless of configuration.

use std::time::Duration;

/// Configuration for stale-write retry behavior
///
/// # Example
/// ```
/// use tally_control::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::bounded(50)
///     .with_base_delay(Duration::from_millis(1))
///     .with_max_delay(Duration::from_millis(50));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum stale-write attempts before giving up
    /// (`None` = retry until success or cancellation)
    pub max_attempts: Option<u32>,
    /// Base delay for exponential backoff (zero = immediate retry)
    pub base_delay: Duration,
    /// Ceiling on the backoff delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    /// Unbounded with no backoff: retry immediately until the write lands
    /// or the caller cancels
    fn default() -> Self {
        Self {
            max_attempts: None,
            base_delay: Duration::ZERO,
            max_delay: Duration::from_millis(50),
        }
    }
}

impl RetryConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that gives up after `max_attempts` stale writes
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            ..Default::default()
        }
    }

    /// Set the maximum number of stale-write attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the base delay for exponential backoff
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the ceiling on the backoff delay
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Backoff delay before the given retry attempt (1-based)
    ///
    /// Doubles the base delay per attempt, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        // Shifting a u32 by 32 overflows; by attempt 32 the delay has long
        // hit the cap anyway.
        let shift = attempt.saturating_sub(1).min(31);
        let multiplier = 1u32 << shift;
        self.base_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_unbounded_without_backoff() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.delay_for(1), Duration::ZERO);
        assert_eq!(config.delay_for(100), Duration::ZERO);
    }

    #[test]
    fn test_bounded() {
        let config = RetryConfig::bounded(5);
        assert_eq!(config.max_attempts, Some(5));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RetryConfig::new()
            .with_base_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(100));

        assert_eq!(config.delay_for(1), Duration::from_millis(10));
        assert_eq!(config.delay_for(2), Duration::from_millis(20));
        assert_eq!(config.delay_for(3), Duration::from_millis(40));
        assert_eq!(config.delay_for(4), Duration::from_millis(80));
        assert_eq!(config.delay_for(5), Duration::from_millis(100));
        assert_eq!(config.delay_for(30), Duration::from_millis(100));
    }

    #[test]
    fn test_backoff_stays_capped_at_high_attempt_counts() {
        let config = RetryConfig::new()
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(50));

        // Attempts past the shift width of the multiplier must stay at the
        // cap, not panic or wrap back to the base delay.
        for attempt in [31, 32, 33, 64, 1_000, u32::MAX] {
            assert_eq!(config.delay_for(attempt), Duration::from_millis(50));
        }
    }

    #[test]
    fn test_builders() {
        let config = RetryConfig::new()
            .with_max_attempts(3)
            .with_base_delay(Duration::from_millis(2))
            .with_max_delay(Duration::from_millis(8));
        assert_eq!(config.max_attempts, Some(3));
        assert_eq!(config.base_delay, Duration::from_millis(2));
        assert_eq!(config.max_delay, Duration::from_millis(8));
    }

    proptest! {
        #[test]
        fn prop_delay_never_exceeds_max(base_ms in 1u64..100, max_ms in 1u64..1_000, attempt in 1u32..1_000) {
            let config = RetryConfig::new()
                .with_base_delay(Duration::from_millis(base_ms))
                .with_max_delay(Duration::from_millis(max_ms));
            prop_assert!(config.delay_for(attempt) <= Duration::from_millis(max_ms));
        }

        #[test]
        fn prop_delay_nondecreasing(base_ms in 1u64..100, attempt in 1u32..100) {
            let config = RetryConfig::new()
                .with_base_delay(Duration::from_millis(base_ms))
                .with_max_delay(Duration::from_secs(3600));
            prop_assert!(config.delay_for(attempt + 1) >= config.delay_for(attempt));
        }
    }
}
