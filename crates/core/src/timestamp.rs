//! Microsecond-precision last-modified timestamp
//!
//! The timestamp doubles as an implicit concurrency token: the store refreshes
//! it on every successful write, and the timestamp-based optimistic controller
//! treats "stored timestamp still equals the one I read" as a proxy for
//! "no one else wrote since I read".
//!
//! ## Resolution hazard
//!
//! A timestamp token is only sound if the store's timestamp resolution is
//! finer than the smallest possible gap between two legitimate writes. Two
//! writes landing within one resolution unit produce equal tokens, and a
//! stale conditional write can then pass its precondition spuriously. The
//! store adapter therefore carries the resolution as an explicit
//! configuration value (see `StoreConfig`), and [`Timestamp::truncate`]
//! applies it. This crate does not hide the hazard; it surfaces it.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Microseconds since Unix epoch
///
/// The canonical time representation for concurrency tokens. Comparable,
/// orderable, and truncatable to a coarser store resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Create a timestamp for the current moment
    ///
    /// Returns epoch if the system clock reads before Unix epoch (e.g. after
    /// an NTP step backwards).
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(since_epoch.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis.saturating_mul(1_000))
    }

    /// Get microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get milliseconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }

    /// Truncate to a coarser resolution
    ///
    /// Floors the timestamp to the nearest multiple of `resolution`. This is
    /// how a store models a backend whose timestamp column is coarser than a
    /// microsecond (a millisecond `timestamp(3)` column, say). A zero or
    /// sub-microsecond resolution leaves the timestamp unchanged.
    pub fn truncate(&self, resolution: Duration) -> Self {
        let unit = resolution.as_micros() as u64;
        if unit <= 1 {
            return *self;
        }
        Timestamp(self.0 - self.0 % unit)
    }

    /// Check if this timestamp is before another
    #[inline]
    pub fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }

    /// Check if this timestamp is after another
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }

    /// Duration elapsed since an earlier timestamp
    ///
    /// Returns `None` if `earlier` is actually later than `self`.
    pub fn duration_since(&self, earlier: Timestamp) -> Option<Duration> {
        self.0
            .checked_sub(earlier.0)
            .map(Duration::from_micros)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:06}", self.0 / 1_000_000, self.0 % 1_000_000)
    }
}

impl From<u64> for Timestamp {
    fn from(micros: u64) -> Self {
        Timestamp(micros)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
