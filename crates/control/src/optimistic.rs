//! Optimistic-version retry controller
//!
//! Reads the record, computes the new counter, and issues a conditional
//! write preconditioned on the version token it read. Losing the race
//! (zero rows affected) restarts the WHOLE read-modify-write cycle; the
//! write is never reissued with stale data. Store errors are fatal and
//! propagate unchanged; only the stale outcome is retried.

use crate::controller::Increment;
use crate::retry::RetryConfig;
use std::sync::Arc;
use tally_core::{CancelToken, Error, RecordId, RecordStore, Result, WriteOutcome};

/// Optimistic controller keyed on the explicit version token
pub struct VersionRetryController<S> {
    store: Arc<S>,
    retry: RetryConfig,
}

impl<S: RecordStore> VersionRetryController<S> {
    /// Create a controller with the default (unbounded) retry policy
    pub fn new(store: Arc<S>) -> Self {
        Self::with_retry(store, RetryConfig::default())
    }

    /// Create a controller with an explicit retry policy
    pub fn with_retry(store: Arc<S>, retry: RetryConfig) -> Self {
        VersionRetryController { store, retry }
    }
}

impl<S: RecordStore> Increment for VersionRetryController<S> {
    fn increment(&self, cancel: &CancelToken, id: &RecordId, delta: i64) -> Result<i64> {
        let mut attempts: u32 = 0;
        loop {
            cancel.check()?;

            let record = self.store.get(cancel, id)?;
            let new_count = record.count + delta;

            match self
                .store
                .update_if_version(cancel, id, new_count, record.version)?
            {
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
                    tracing::trace!(%id, attempts, "stale version, restarting read-modify-write");
                    let delay = self.retry.delay_for(attempts);
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }
}
