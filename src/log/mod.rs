//! Log Module
//!
//! The ordered, offset-addressable record store.
//!
//! ## Responsibilities
//! - Assign contiguous, zero-based offsets on append
//! - Serve reads by exact offset
//! - Keep append order as read order (no reordering, no removal)
//! - Guard the record sequence for concurrent callers
//!
//! ## Data Structure Choice
//! A `Vec<Record>` wrapped in a RwLock:
//! - A record's offset is its index, so offsets cannot skip or repeat
//! - Appends take the write lock, reads share the read lock

mod store;

pub use store::Log;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single entry stored in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque payload, compared as raw bytes
    pub value: Bytes,

    /// Position in the log. Assigned on append; ignored on input.
    pub offset: u64,
}

impl Record {
    /// Create a record with an unassigned offset
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            offset: 0,
        }
    }

    /// Encode the record as a response payload
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a record from a response payload
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
