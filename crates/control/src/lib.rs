//! Concurrency-control layer for Tally
//!
//! Three interchangeable strategies guarantee that concurrent increments of
//! a shared counter record never lose updates:
//!
//! 1. [`VersionRetryController`] — optimistic; conditional writes
//!    preconditioned on an explicit version token, full read-modify-write
//!    retry on conflict
//! 2. [`RowLockController`] — pessimistic; an exclusive row lock inside a
//!    store transaction serializes contenders, no retry needed
//! 3. [`TimestampRetryController`] — optimistic; the last-modified timestamp
//!    stands in for the version token (resolution hazard documented on the
//!    module)
//!
//! All three expose the same operation through the [`Increment`] trait and
//! the [`Controller`] closed set of variants. A deployment selects exactly
//! one strategy per entity class and never mixes strategies on the same row.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controller;
pub mod optimistic;
pub mod pessimistic;
pub mod retry;
pub mod timestamp;

pub use controller::{Controller, Increment};
pub use optimistic::VersionRetryController;
pub use pessimistic::RowLockController;
pub use retry::RetryConfig;
pub use timestamp::TimestampRetryController;
