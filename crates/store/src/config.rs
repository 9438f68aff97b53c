//! Store configuration

use std::time::Duration;

/// Default timestamp resolution: one millisecond
///
/// Matches the millisecond `timestamp(3)` column a relational backend
/// typically stores its last-modified token in.
pub const DEFAULT_TIMESTAMP_RESOLUTION: Duration = Duration::from_millis(1);

/// Configuration for a record store
///
/// The timestamp resolution is an explicit contract, not an assumption:
/// the timestamp-based optimistic strategy is only sound when the
/// resolution is finer than the smallest possible gap between two
/// legitimate writes. Coarsening it (e.g. in a test) reproduces the
/// documented hazard where a stale write passes its precondition.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Granularity of the `updated_at` token assigned on every write
    pub timestamp_resolution: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timestamp_resolution: DEFAULT_TIMESTAMP_RESOLUTION,
        }
    }
}

impl StoreConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp resolution
    pub fn with_timestamp_resolution(mut self, resolution: Duration) -> Self {
        self.timestamp_resolution = resolution;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolution_is_one_millisecond() {
        assert_eq!(
            StoreConfig::default().timestamp_resolution,
            Duration::from_millis(1)
        );
    }

    #[test]
    fn test_with_timestamp_resolution() {
        let config = StoreConfig::new().with_timestamp_resolution(Duration::from_secs(1));
        assert_eq!(config.timestamp_resolution, Duration::from_secs(1));
    }
}
