//! Log implementation
//!
//! Vec-based record store with RwLock for concurrency.

use parking_lot::RwLock;

use crate::error::{Result, SeqlogError};
use super::Record;

/// In-memory, append-only record log
///
/// ## Concurrency
/// - `records`: the only shared mutable state, behind one RwLock
/// - `append` holds the write lock across "check length, push", so two
///   appends can never observe the same length
/// - `read` holds the read lock across "bounds check, clone", so it never
///   sees a half-finished append
pub struct Log {
    records: RwLock<Vec<Record>>,

    /// Optional upper bound on record count
    capacity_limit: Option<usize>,
}

impl Log {
    /// Create an empty, unbounded log
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            capacity_limit: None,
        }
    }

    /// Create an empty log that holds at most `limit` records
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            capacity_limit: Some(limit),
        }
    }

    /// Append a record and return the offset it was stored at
    ///
    /// Any offset on the input is overwritten. Fails only with
    /// [`SeqlogError::LogFull`] on a bounded log that is at its limit.
    pub fn append(&self, mut record: Record) -> Result<u64> {
        let mut records = self.records.write();

        if let Some(capacity) = self.capacity_limit {
            if records.len() >= capacity {
                tracing::warn!(capacity, "append rejected, log is full");
                return Err(SeqlogError::LogFull { capacity });
            }
        }

        let offset = records.len() as u64;
        record.offset = offset;
        records.push(record);

        debug_assert_eq!(records.len() as u64, offset + 1);
        tracing::trace!(offset, "appended record");

        Ok(offset)
    }

    /// Read the record stored at `offset`
    pub fn read(&self, offset: u64) -> Result<Record> {
        let records = self.records.read();

        let record = usize::try_from(offset)
            .ok()
            .and_then(|index| records.get(index))
            .cloned()
            .ok_or(SeqlogError::OffsetNotFound { offset })?;

        tracing::trace!(offset, "read record");
        Ok(record)
    }

    /// Number of records appended so far
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Offset the next successful append will receive
    pub fn next_offset(&self) -> u64 {
        self.records.read().len() as u64
    }

    /// The configured record limit, if any
    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity_limit
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}
