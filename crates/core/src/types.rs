//! Identifier types for Tally records

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a contended record
///
/// A RecordId is a wrapper around a UUID v4, assigned once at record
/// creation and immutable afterwards. All store and controller operations
/// address records by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random RecordId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a RecordId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a RecordId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this RecordId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
