//! Core types and traits for Tally
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId: Unique identifier for contended records
//! - TallyRecord: The versioned entity (counter + concurrency tokens)
//! - Version: Explicit integer concurrency token
//! - Timestamp: Last-modified timestamp used as an implicit token
//! - CancelToken: Cooperative cancellation/deadline handle
//! - Error: Error type hierarchy
//! - Traits: Store contract (RecordStore, RowTxn)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod error;
pub mod record;
pub mod timestamp;
pub mod traits;
pub mod types;
pub mod version;

// Re-export commonly used types and traits
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use record::{TallyRecord, WriteOutcome};
pub use timestamp::Timestamp;
pub use traits::{RecordStore, RowTxn};
pub use types::RecordId;
pub use version::Version;
