//! Error types for SeqLog
//!
//! Provides a unified error type for all operations.
//!
//! Only [`SeqlogError::OffsetNotFound`] carries domain meaning for callers;
//! every other variant is treated as an internal fault by the handler layer.

use thiserror::Error;

/// Result type alias using SeqlogError
pub type Result<T> = std::result::Result<T, SeqlogError>;

/// Unified error type for SeqLog operations
#[derive(Debug, Error)]
pub enum SeqlogError {
    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    #[error("offset out of range: {offset}")]
    OffsetNotFound { offset: u64 },

    #[error("log is full: capacity of {capacity} records reached")]
    LogFull { capacity: usize },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Fault reported back by a remote server
    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SeqlogError {
    /// True if this is the distinguished offset-not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, SeqlogError::OffsetNotFound { .. })
    }
}

impl From<bincode::Error> for SeqlogError {
    fn from(err: bincode::Error) -> Self {
        SeqlogError::Serialization(err.to_string())
    }
}
