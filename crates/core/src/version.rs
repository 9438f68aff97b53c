//! Explicit integer concurrency token
//!
//! Every successful write to a record advances its [`Version`]. Optimistic
//! controllers read the version alongside the counter and make it the
//! precondition of their conditional write: the write lands only if the
//! stored version still equals the one read.
//!
//! ## Invariants
//!
//! - Versions are monotonically increasing within a record
//! - A version never regresses; the store bumps it on every successful write

use serde::{Deserialize, Serialize};

/// Explicit version token attached to a record
///
/// Wraps a `u64` mutation counter. The store owns advancement: callers never
/// construct the "next" version themselves, they only compare tokens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// Version of a record that has never been written
    pub const ZERO: Version = Version(0);

    /// Create a version with an explicit value
    pub const fn new(n: u64) -> Self {
        Version(n)
    }

    /// Get the numeric value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The version after one more successful write
    ///
    /// Saturates at `u64::MAX` rather than wrapping, so a version can
    /// never regress.
    pub const fn next(&self) -> Self {
        Version(self.0.saturating_add(1))
    }

    /// Check whether this record has never been written
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(n: u64) -> Self {
        Version(n)
    }
}

impl From<Version> for u64 {
    fn from(v: Version) -> Self {
        v.0
    }
}
