//! Handler Module
//!
//! Translates decoded commands into Log calls and Log outcomes into
//! responses.
//!
//! ## Status Mapping
//! - PRODUCE: success → OK(offset), any error → ERROR
//! - CONSUME: success → OK(record), OffsetNotFound → NOT_FOUND,
//!   any other error → ERROR
//! - PING:    OK("PONG")

use std::sync::Arc;

use crate::error::{Result, SeqlogError};
use crate::log::{Log, Record};
use crate::protocol::{Command, Response};

/// Routes commands to a shared [`Log`]
///
/// Cheap to clone; every clone talks to the same log.
#[derive(Clone)]
pub struct Handler {
    log: Arc<Log>,
}

impl Handler {
    /// Create a handler over an explicitly owned log
    pub fn new(log: Arc<Log>) -> Self {
        Self { log }
    }

    /// Execute a command and return the response to send back
    pub fn handle(&self, command: Command) -> Response {
        match command {
            Command::Produce { value } => match self.produce(Record::new(value)) {
                Ok(offset) => Response::offset(offset),
                Err(e) => {
                    tracing::warn!("produce failed: {}", e);
                    Response::error(&e.to_string())
                }
            },
            Command::Consume { offset } => match self.consume(offset) {
                Ok(payload) => Response::ok(Some(payload)),
                Err(SeqlogError::OffsetNotFound { .. }) => Response::not_found(),
                Err(e) => {
                    tracing::warn!(offset, "consume failed: {}", e);
                    Response::error(&e.to_string())
                }
            },
            Command::Ping => Response::ok(Some(b"PONG".to_vec())),
        }
    }

    fn produce(&self, record: Record) -> Result<u64> {
        self.log.append(record)
    }

    fn consume(&self, offset: u64) -> Result<Vec<u8>> {
        self.log.read(offset)?.to_bytes()
    }

    /// The log this handler serves
    pub fn log(&self) -> &Arc<Log> {
        &self.log
    }
}
