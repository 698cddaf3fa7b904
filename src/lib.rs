//! # SeqLog
//!
//! An append-only record log served over TCP:
//! - Records get contiguous, zero-based offsets on append
//! - Reads by offset, with a distinct not-found error
//! - Single RwLock around the record sequence for concurrent access
//! - Framed binary client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (Acceptor + Worker Pool)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Handler                                 │
//! │          (Command → Log call → Response status)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │      Log      │
//!               │ (RwLock<Vec>) │
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use seqlog::{Log, Record};
//!
//! let log = Log::new();
//! assert_eq!(log.append(Record::new("a")).unwrap(), 0);
//! assert_eq!(log.append(Record::new("b")).unwrap(), 1);
//! assert_eq!(log.read(1).unwrap().value, "b");
//! assert!(log.read(2).unwrap_err().is_not_found());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod protocol;
pub mod handler;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SeqlogError, Result};
pub use config::Config;
pub use log::{Log, Record};
pub use handler::Handler;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SeqLog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
