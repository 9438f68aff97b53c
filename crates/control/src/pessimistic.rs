//! Pessimistic row-lock controller
//!
//! Opens a store transaction, takes the exclusive row lock with a blocking
//! locking read, writes the new counter inside the same transaction, and
//! commits. The lock serializes all contenders, so no retry loop exists;
//! each caller waits its turn instead of racing.
//!
//! Failure after lock acquisition rolls the transaction back (releasing the
//! lock) and surfaces the error as fatal. This is the deliberate asymmetry
//! against the optimistic controllers: blocking cost instead of retry
//! complexity.
//!
//! Lifecycle of one increment:
//!
//! ```text
//! Idle -> LockAcquired -> Updated -> Committed     (success)
//! Idle -> LockAcquired -> RolledBack               (failure)
//! ```

use crate::controller::Increment;
use std::sync::Arc;
use tally_core::{CancelToken, RecordId, RecordStore, Result};

/// Pessimistic controller built on the store's transactional row lock
pub struct RowLockController<S> {
    store: Arc<S>,
}

impl<S: RecordStore> RowLockController<S> {
    /// Create a controller over the given store
    pub fn new(store: Arc<S>) -> Self {
        RowLockController { store }
    }
}

impl<S: RecordStore> Increment for RowLockController<S> {
    fn increment(&self, cancel: &CancelToken, id: &RecordId, delta: i64) -> Result<i64> {
        let new_count = self.store.transaction(cancel, |txn| {
            let count = txn.locking_read(id)?;
            let new_count = count + delta;
            txn.write(id, new_count)?;
            Ok(new_count)
        })?;
        tracing::debug!(%id, new_count, "increment committed under row lock");
        Ok(new_count)
    }
}
