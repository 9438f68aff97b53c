//! Store contract
//!
//! This module defines the traits that separate the concurrency-control layer
//! from the durable record store behind it. Controllers are generic over
//! [`RecordStore`]; any ACID-capable backend with row-level locking and
//! atomic single-row writes can implement it (the in-memory adapter in
//! `tally-store` is one such backend).
//!
//! Three capabilities make up the contract:
//! - point-in-time snapshot reads (`get`)
//! - conditional single-row writes, preconditioned on either token
//!   (`update_if_version`, `update_if_unmodified_since`)
//! - transactional execution with an exclusive-lock read available inside
//!   (`transaction` + [`RowTxn`])
//!
//! Every operation takes a [`CancelToken`] and fails fast with
//! `Error::Cancelled` once it is tripped.

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::record::{TallyRecord, WriteOutcome};
use crate::timestamp::Timestamp;
use crate::types::RecordId;
use crate::version::Version;

/// Operations available inside a store transaction
///
/// A transaction works on one row at a time: `locking_read` acquires the
/// exclusive row lock (blocking until any other holder commits or rolls
/// back) and `write` stages the new counter value. The staged write becomes
/// visible only when the transaction commits; on rollback it is discarded
/// and the lock released untouched.
pub trait RowTxn {
    /// Read the counter under an exclusive row lock
    ///
    /// Blocks until the lock is acquired. The lock is held until the
    /// enclosing transaction ends.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id does not exist and `Cancelled` if the
    /// caller's token trips while waiting for the lock.
    fn locking_read(&mut self, id: &RecordId) -> Result<i64>;

    /// Stage a plain write of the counter
    ///
    /// Requires a prior `locking_read` of the same row in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the row is not locked by this
    /// transaction.
    fn write(&mut self, id: &RecordId, new_count: i64) -> Result<()>;
}

/// Durable record store abstraction
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads and processes contending on the same row (requires
/// `Send + Sync`). The store is the single arbitration point; controllers
/// keep no shared mutable state of their own.
pub trait RecordStore: Send + Sync {
    /// Insert a new record
    ///
    /// The store stamps `created_at`/`updated_at` with its own clock
    /// (truncated to its timestamp resolution).
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the id already exists.
    fn insert(&self, cancel: &CancelToken, record: TallyRecord) -> Result<()>;

    /// Point-in-time snapshot read
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id does not exist.
    fn get(&self, cancel: &CancelToken, id: &RecordId) -> Result<TallyRecord>;

    /// Conditional write preconditioned on the explicit version token
    ///
    /// Writes `new_count` iff the stored version still equals `expected` at
    /// write time. A failed precondition affects zero rows and returns
    /// `WriteOutcome::Stale`, not an error. On success the store bumps the
    /// version and refreshes `updated_at`.
    fn update_if_version(
        &self,
        cancel: &CancelToken,
        id: &RecordId,
        new_count: i64,
        expected: Version,
    ) -> Result<WriteOutcome>;

    /// Conditional write preconditioned on the last-modified timestamp
    ///
    /// Same semantics as [`update_if_version`](Self::update_if_version) with
    /// the stored `updated_at` as the token. Only sound if the store's
    /// timestamp resolution is finer than the minimum inter-write gap; see
    /// the resolution hazard documented on [`Timestamp`].
    fn update_if_unmodified_since(
        &self,
        cancel: &CancelToken,
        id: &RecordId,
        new_count: i64,
        expected: Timestamp,
    ) -> Result<WriteOutcome>;

    /// Execute `f` inside a transaction
    ///
    /// Commits the staged writes when `f` returns `Ok`, rolls them back on
    /// `Err`. Row locks acquired by `f` through [`RowTxn::locking_read`] are
    /// released on every exit path.
    fn transaction<F, T>(&self, cancel: &CancelToken, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn RowTxn) -> Result<T>,
        Self: Sized;
}
