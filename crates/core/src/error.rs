//! Error types for Tally
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Note that a stale conditional write is NOT an error: the store reports it
//! as [`crate::record::WriteOutcome::Stale`], a distinguishable zero-effect
//! result that optimistic controllers handle by retrying. Everything in this
//! enum is fatal to the call that observes it.

use crate::types::RecordId;
use thiserror::Error;

/// Result type alias for Tally operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Tally
#[derive(Debug, Error)]
pub enum Error {
    /// Record id does not exist in the store
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// Store engine or transport failure
    ///
    /// Never retried by controllers. Retry-on-transient-failure, if desired,
    /// is the store adapter's responsibility.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The caller's cancellation token was tripped or its deadline passed
    #[error("Operation cancelled")]
    Cancelled,

    /// An optimistic controller with a bounded retry policy gave up
    #[error("Gave up after {attempts} stale-write attempts")]
    RetriesExhausted {
        /// Number of read-modify-write cycles that observed a stale token
        attempts: u32,
    },

    /// Invalid operation or state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// Check whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
