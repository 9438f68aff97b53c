//! The versioned entity under contention
//!
//! A [`TallyRecord`] is one identified row holding a mutable counter plus the
//! two concurrency tokens the optimistic strategies check: an explicit
//! [`Version`] and a last-modified [`Timestamp`]. The remaining fields are
//! immutable payload, irrelevant to the concurrency protocol.
//!
//! The STORE owns the tokens: it bumps `version` and refreshes `updated_at`
//! on every successful write, on every write path, including writes made
//! under the pessimistic row lock. Callers only compare tokens, never
//! advance them.

use crate::timestamp::Timestamp;
use crate::types::RecordId;
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contended record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyRecord {
    /// Stable unique identifier, assigned at creation, immutable
    pub id: RecordId,
    /// Immutable payload
    pub title: String,
    /// Immutable payload
    pub author: String,
    /// Immutable payload
    pub published_at: DateTime<Utc>,
    /// When the record was inserted
    pub created_at: Timestamp,
    /// The value under contention
    pub count: i64,
    /// Explicit concurrency token, advanced by the store on every write
    pub version: Version,
    /// Implicit concurrency token, refreshed by the store on every write
    /// (truncated to the store's configured timestamp resolution)
    pub updated_at: Timestamp,
}

impl TallyRecord {
    /// Create a record with a zero counter and unwritten tokens
    ///
    /// The store normalizes `created_at`/`updated_at` on insert.
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        author: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        let now = Timestamp::now();
        TallyRecord {
            id,
            title: title.into(),
            author: author.into(),
            published_at,
            created_at: now,
            count: 0,
            version: Version::ZERO,
            updated_at: now,
        }
    }

    /// Create a record with a caller-supplied initial counter
    pub fn with_count(
        id: RecordId,
        title: impl Into<String>,
        author: impl Into<String>,
        published_at: DateTime<Utc>,
        count: i64,
    ) -> Self {
        TallyRecord {
            count,
            ..TallyRecord::new(id, title, author, published_at)
        }
    }
}

/// Result of a conditional write
///
/// A conditional write either affects exactly one row (the precondition held
/// at write time) or zero rows (someone else wrote first). Zero rows is NOT
/// an error; it is the signal the optimistic controllers retry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Precondition held; exactly one row was written. Carries the version
    /// the store assigned to the write.
    Applied(Version),
    /// Precondition no longer matched the stored state; zero rows affected.
    Stale,
}

impl WriteOutcome {
    /// Check whether the write landed
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TallyRecord {
        TallyRecord::new(
            RecordId::new(),
            "The Art of Computer Programming",
            "Donald Knuth",
            Utc::now(),
        )
    }

    #[test]
    fn test_new_record_starts_unwritten() {
        let record = sample();
        assert_eq!(record.count, 0);
        assert_eq!(record.version, Version::ZERO);
    }

    #[test]
    fn test_with_count_sets_initial_counter() {
        let record = TallyRecord::with_count(RecordId::new(), "t", "a", Utc::now(), 10);
        assert_eq!(record.count, 10);
        assert_eq!(record.version, Version::ZERO);
    }

    #[test]
    fn test_record_serialization() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let restored: TallyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, restored);
    }

    #[test]
    fn test_write_outcome_is_applied() {
        assert!(WriteOutcome::Applied(Version::new(1)).is_applied());
        assert!(!WriteOutcome::Stale.is_applied());
    }
}
