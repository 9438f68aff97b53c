//! Tally - Concurrency-safe counter updates over a shared record store
//!
//! Tally provides three interchangeable strategies for incrementing a
//! counter in a record that many writers contend for: optimistic retry on
//! an explicit version token, a pessimistic exclusive row lock, and
//! optimistic retry on the last-modified timestamp.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use tally::{CancelToken, Controller, Increment, MemStore, RecordId, RecordStore, TallyRecord};
//!
//! # fn main() -> tally::Result<()> {
//! let store = Arc::new(MemStore::new());
//! let cancel = CancelToken::new();
//!
//! let id = RecordId::new();
//! store.insert(&cancel, TallyRecord::new(id, "Dune", "Frank Herbert", Utc::now()))?;
//!
//! // Pick a strategy once per entity class; all three expose `increment`.
//! let controller = Controller::version_retry(store);
//! let new_count = controller.increment(&cancel, &id, 1)?;
//! assert_eq!(new_count, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The workspace splits along the seams of the protocol:
//!
//! - `tally-core`: record model, concurrency tokens, the [`RecordStore`]
//!   contract, errors, and cancellation
//! - `tally-store`: the in-memory [`MemStore`] backend
//! - `tally-control`: the three controllers behind the [`Increment`] trait
//!
//! Strategies must not be mixed on the same row; see [`Controller`].

pub use tally_control::{
    Controller, Increment, RetryConfig, RowLockController, TimestampRetryController,
    VersionRetryController,
};
pub use tally_core::{
    CancelToken, Error, RecordId, RecordStore, Result, RowTxn, TallyRecord, Timestamp, Version,
    WriteOutcome,
};
pub use tally_store::{MemStore, StoreConfig};
