//! Command definitions
//!
//! Represents requests from clients.

use bytes::Bytes;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Produce = 0x01,
    Consume = 0x02,
    Ping = 0x03,
}

impl TryFrom<u8> for CommandType {
    type Error = u8;

    fn try_from(byte: u8) -> std::result::Result<Self, u8> {
        match byte {
            0x01 => Ok(CommandType::Produce),
            0x02 => Ok(CommandType::Consume),
            0x03 => Ok(CommandType::Ping),
            other => Err(other),
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a record carrying `value`
    Produce { value: Bytes },

    /// Fetch the record at `offset`
    Consume { offset: u64 },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Produce { .. } => CommandType::Produce,
            Command::Consume { .. } => CommandType::Consume,
            Command::Ping => CommandType::Ping,
        }
    }
}
