//! In-memory record store adapter for Tally
//!
//! This crate implements the `RecordStore` contract against process memory:
//! - MemStore: DashMap row table with one mutex per row
//! - StoreConfig: the timestamp-resolution contract
//!
//! Conditional writes take the row mutex only for the duration of the
//! compare-and-write; the transactional path holds it from the locking read
//! until commit or rollback, which is exactly the window a relational
//! backend would hold a `SELECT ... FOR UPDATE` row lock.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod mem;

pub use config::StoreConfig;
pub use mem::MemStore;
