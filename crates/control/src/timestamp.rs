//! Optimistic-timestamp retry controller
//!
//! Identical protocol to the version-based controller, but the record's
//! last-modified timestamp is the concurrency token: the conditional write
//! lands only while the stored `updated_at` still equals the one read.
//! The store refreshes the timestamp on every successful write, so equality
//! is a proxy for "no one else wrote since I read".
//!
//! ## Resolution hazard
//!
//! This proxy is only sound when the store's timestamp resolution is finer
//! than the smallest possible gap between two legitimate writes. Two writes
//! landing within one resolution unit leave the token unchanged, and a
//! third writer holding the older token then passes its precondition
//! spuriously, silently overwriting the intervening change. The store
//! adapter carries the resolution as explicit configuration
//! (`StoreConfig::timestamp_resolution`, millisecond default); deployments
//! must keep it finer than their minimum inter-write gap. This controller
//! keeps the timestamp protocol as-is and does not paper over the risk.

use crate::controller::Increment;
use crate::retry::RetryConfig;
use std::sync::Arc;
use tally_core::{CancelToken, Error, RecordId, RecordStore, Result, WriteOutcome};

/// Optimistic controller keyed on the last-modified timestamp
pub struct TimestampRetryController<S> {
    store: Arc<S>,
    retry: RetryConfig,
}

impl<S: RecordStore> TimestampRetryController<S> {
    /// Create a controller with the default (unbounded) retry policy
    pub fn new(store: Arc<S>) -> Self {
        Self::with_retry(store, RetryConfig::default())
    }

    /// Create a controller with an explicit retry policy
    pub fn with_retry(store: Arc<S>, retry: RetryConfig) -> Self {
        TimestampRetryController { store, retry }
    }
}

impl<S: RecordStore> Increment for TimestampRetryController<S> {
    fn increment(&self, cancel: &CancelToken, id: &RecordId, delta: i64) -> Result<i64> {
        let mut attempts: u32 = 0;
        loop {
            cancel.check()?;

            let record = self.store.get(cancel, id)?;
            let new_count = record.count + delta;

            match self.store.update_if_unmodified_since(
                cancel,
                id,
                new_count,
                record.updated_at,
            )? {
                WriteOutcome::Applied(version) => {
                    tracing::debug!(%id, %version, new_count, attempts, "increment applied");
                    return Ok(new_count);
                }
                WriteOutcome::Stale => {
                    attempts += 1;
                    if let Some(cap) = self.retry.max_attempts {
                        if attempts >= cap {
                            return Err(Error::RetriesExhausted { attempts });
                        }
                    }
                    tracing::trace!(%id, attempts, "record modified since read, restarting");
                    let delay = self.retry.delay_for(attempts);
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }
}
