//! The shared increment capability and the closed strategy set
//!
//! Every strategy exposes the same operation, so callers can hold any of
//! them behind [`Increment`]. [`Controller`] is the closed set of variants a
//! deployment chooses from at entity-configuration time; strategies are
//! never mixed on the same row, because a lock-based writer would be
//! invisible to an optimistic precondition check unless the token is also
//! advanced under the lock (the bundled `MemStore` does advance it, but the
//! contract does not require every backend to).

use crate::optimistic::VersionRetryController;
use crate::pessimistic::RowLockController;
use crate::retry::RetryConfig;
use crate::timestamp::TimestampRetryController;
use std::sync::Arc;
use tally_core::{CancelToken, RecordId, RecordStore, Result};

/// The one operation all strategies share
pub trait Increment {
    /// Add `delta` to the record's counter, returning the new value
    ///
    /// Exactly-once effect: the call returns `Ok(new_value)` only after a
    /// write affecting exactly one row, and a terminal error otherwise.
    /// Callers never observe a lost update.
    fn increment(&self, cancel: &CancelToken, id: &RecordId, delta: i64) -> Result<i64>;
}

/// Closed set of concurrency-control strategies
///
/// Selected once per entity class. See the crate docs for the trade-offs.
pub enum Controller<S> {
    /// Optimistic, explicit version token
    VersionRetry(VersionRetryController<S>),
    /// Pessimistic, exclusive row lock
    RowLock(RowLockController<S>),
    /// Optimistic, last-modified timestamp token
    TimestampRetry(TimestampRetryController<S>),
}

impl<S: RecordStore> Controller<S> {
    /// Optimistic-version strategy with the default retry policy
    pub fn version_retry(store: Arc<S>) -> Self {
        Controller::VersionRetry(VersionRetryController::new(store))
    }

    /// Optimistic-version strategy with an explicit retry policy
    pub fn version_retry_with(store: Arc<S>, retry: RetryConfig) -> Self {
        Controller::VersionRetry(VersionRetryController::with_retry(store, retry))
    }

    /// Pessimistic row-lock strategy
    pub fn row_lock(store: Arc<S>) -> Self {
        Controller::RowLock(RowLockController::new(store))
    }

    /// Optimistic-timestamp strategy with the default retry policy
    pub fn timestamp_retry(store: Arc<S>) -> Self {
        Controller::TimestampRetry(TimestampRetryController::new(store))
    }

    /// Optimistic-timestamp strategy with an explicit retry policy
    pub fn timestamp_retry_with(store: Arc<S>, retry: RetryConfig) -> Self {
        Controller::TimestampRetry(TimestampRetryController::with_retry(store, retry))
    }
}

impl<S: RecordStore> Increment for Controller<S> {
    fn increment(&self, cancel: &CancelToken, id: &RecordId, delta: i64) -> Result<i64> {
        match self {
            Controller::VersionRetry(c) => c.increment(cancel, id, delta),
            Controller::RowLock(c) => c.increment(cancel, id, delta),
            Controller::TimestampRetry(c) => c.increment(cancel, id, delta),
        }
    }
}
