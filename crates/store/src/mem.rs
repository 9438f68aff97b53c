//! In-memory record store
//!
//! `MemStore` keeps one mutex-wrapped row per record in a DashMap. The row
//! mutex plays the role of the backend's row lock:
//!
//! - conditional writes hold it only across the compare-and-write, which
//!   models an atomic single-row `UPDATE ... WHERE token = ?`;
//! - transactions acquire it at the locking read and hold it until commit
//!   or rollback, which models `SELECT ... FOR UPDATE`.
//!
//! The store owns both concurrency tokens: every successful write, on every
//! path, bumps the version and refreshes `updated_at` truncated to the
//! configured resolution. That keeps the tokens advancing even for writes
//! made under the row lock.

use crate::config::StoreConfig;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::sync::Arc;
use std::time::Duration;
use tally_core::{
    CancelToken, Error, RecordId, RecordStore, Result, RowTxn, TallyRecord, Timestamp, Version,
    WriteOutcome,
};

/// How often a blocked locking read rechecks its cancellation token
const LOCK_POLL: Duration = Duration::from_micros(500);

type Row = Arc<Mutex<TallyRecord>>;
type RowGuard = ArcMutexGuard<RawMutex, TallyRecord>;

/// In-memory implementation of [`RecordStore`]
pub struct MemStore {
    rows: DashMap<RecordId, Row>,
    config: StoreConfig,
}

impl MemStore {
    /// Create a store with the default configuration
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with an explicit configuration
    pub fn with_config(config: StoreConfig) -> Self {
        MemStore {
            rows: DashMap::new(),
            config,
        }
    }

    /// The configuration this store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn row(&self, id: &RecordId) -> Result<Row> {
        self.rows
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::NotFound(*id))
    }

    /// Take the row mutex, staying responsive to cancellation while blocked
    ///
    /// Every path that can wait behind a held transaction lock goes through
    /// here, so a tripped token or expired deadline unblocks the caller with
    /// `Error::Cancelled` instead of parking it until the holder commits.
    fn lock_row(&self, cancel: &CancelToken, row: &Row) -> Result<RowGuard> {
        loop {
            cancel.check()?;
            match row.try_lock_arc() {
                Some(guard) => return Ok(guard),
                None => std::thread::sleep(LOCK_POLL),
            }
        }
    }

    /// Advance both concurrency tokens after a successful write
    fn stamp(&self, record: &mut TallyRecord) {
        record.version = record.version.next();
        record.updated_at = Timestamp::now().truncate(self.config.timestamp_resolution);
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemStore {
    fn insert(&self, cancel: &CancelToken, mut record: TallyRecord) -> Result<()> {
        cancel.check()?;
        let now = Timestamp::now().truncate(self.config.timestamp_resolution);
        record.created_at = now;
        record.updated_at = now;

        match self.rows.entry(record.id) {
            Entry::Occupied(_) => Err(Error::InvalidOperation(format!(
                "record {} already exists",
                record.id
            ))),
            Entry::Vacant(slot) => {
                tracing::debug!(id = %record.id, "record inserted");
                slot.insert(Arc::new(Mutex::new(record)));
                Ok(())
            }
        }
    }

    fn get(&self, cancel: &CancelToken, id: &RecordId) -> Result<TallyRecord> {
        cancel.check()?;
        let row = self.row(id)?;
        let guard = self.lock_row(cancel, &row)?;
        Ok(guard.clone())
    }

    fn update_if_version(
        &self,
        cancel: &CancelToken,
        id: &RecordId,
        new_count: i64,
        expected: Version,
    ) -> Result<WriteOutcome> {
        cancel.check()?;
        let row = self.row(id)?;
        let mut guard = self.lock_row(cancel, &row)?;
        if guard.version != expected {
            tracing::trace!(
                %id,
                expected = %expected,
                actual = %guard.version,
                "conditional write rejected: stale version"
            );
            return Ok(WriteOutcome::Stale);
        }
        guard.count = new_count;
        self.stamp(&mut guard);
        tracing::debug!(%id, new_count, version = %guard.version, "conditional write applied");
        Ok(WriteOutcome::Applied(guard.version))
    }

    fn update_if_unmodified_since(
        &self,
        cancel: &CancelToken,
        id: &RecordId,
        new_count: i64,
        expected: Timestamp,
    ) -> Result<WriteOutcome> {
        cancel.check()?;
        let row = self.row(id)?;
        let mut guard = self.lock_row(cancel, &row)?;
        if guard.updated_at != expected {
            tracing::trace!(
                %id,
                expected = %expected,
                actual = %guard.updated_at,
                "conditional write rejected: record modified since read"
            );
            return Ok(WriteOutcome::Stale);
        }
        guard.count = new_count;
        self.stamp(&mut guard);
        tracing::debug!(%id, new_count, updated_at = %guard.updated_at, "conditional write applied");
        Ok(WriteOutcome::Applied(guard.version))
    }

    fn transaction<F, T>(&self, cancel: &CancelToken, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn RowTxn) -> Result<T>,
    {
        cancel.check()?;
        let mut txn = MemTxn {
            store: self,
            cancel,
            locked: None,
            staged: None,
        };
        match f(&mut txn) {
            Ok(value) => {
                txn.commit();
                Ok(value)
            }
            Err(e) => {
                txn.rollback();
                Err(e)
            }
        }
    }
}

/// A single-row transaction over `MemStore`
///
/// Holds the row lock from the locking read until `commit`/`rollback`,
/// where dropping the guard releases it on every exit path.
struct MemTxn<'a> {
    store: &'a MemStore,
    cancel: &'a CancelToken,
    locked: Option<(RecordId, RowGuard)>,
    staged: Option<i64>,
}

impl MemTxn<'_> {
    fn commit(mut self) {
        if let (Some((id, guard)), Some(new_count)) = (self.locked.as_mut(), self.staged) {
            guard.count = new_count;
            self.store.stamp(guard);
            tracing::debug!(%id, new_count, version = %guard.version, "transaction committed");
        }
    }

    fn rollback(self) {
        if let Some((id, _)) = &self.locked {
            tracing::debug!(%id, "transaction rolled back");
        }
    }
}

impl RowTxn for MemTxn<'_> {
    fn locking_read(&mut self, id: &RecordId) -> Result<i64> {
        self.cancel.check()?;
        if let Some((locked_id, guard)) = &self.locked {
            if locked_id == id {
                return Ok(guard.count);
            }
            return Err(Error::InvalidOperation(
                "transaction already holds a lock on a different row".to_string(),
            ));
        }

        let row = self.store.row(id)?;
        let guard = self.store.lock_row(self.cancel, &row)?;
        let count = guard.count;
        self.locked = Some((*id, guard));
        Ok(count)
    }

    fn write(&mut self, id: &RecordId, new_count: i64) -> Result<()> {
        self.cancel.check()?;
        match &self.locked {
            Some((locked_id, _)) if locked_id == id => {
                self.staged = Some(new_count);
                Ok(())
            }
            _ => Err(Error::InvalidOperation(
                "write requires a locking read of the row first".to_string(),
            )),
        }
    }
}
