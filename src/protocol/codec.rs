//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - PRODUCE: raw record value (may be empty, at most `MAX_VALUE_SIZE`)
//! - CONSUME: offset (8 bytes, big-endian)
//! - PING:    empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::Bytes;

use crate::error::{Result, SeqlogError};
use super::{Command, CommandType, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Bytes a CONSUME reply adds around the value: bincode length prefix (8)
/// plus the record offset (8)
pub const RECORD_OVERHEAD: usize = 16;

/// Largest PRODUCE value whose CONSUME reply still fits in one frame
pub const MAX_VALUE_SIZE: usize = MAX_PAYLOAD_SIZE as usize - RECORD_OVERHEAD;

const OFFSET_SIZE: usize = 8;

// =============================================================================
// Framing
// =============================================================================

/// Callers keep `payload` within [`MAX_PAYLOAD_SIZE`]; the length field is
/// only 4 bytes wide.
fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(tag);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(payload);
    message
}

/// Split a complete frame into its tag byte and payload
fn unframe<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(SeqlogError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = payload_len(&bytes[..HEADER_SIZE], what)?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(SeqlogError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[0], &bytes[HEADER_SIZE..total_len]))
}

fn payload_len(header: &[u8], what: &str) -> Result<usize> {
    let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
    if len > MAX_PAYLOAD_SIZE {
        return Err(SeqlogError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len as usize)
}

/// Read one full frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R, what: &str) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let len = payload_len(&header, what)?;

    let mut message = vec![0u8; HEADER_SIZE + len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload.
/// Produce values longer than [`MAX_VALUE_SIZE`] encode but are rejected
/// by [`decode_command`].
pub fn encode_command(command: &Command) -> Vec<u8> {
    let cmd_type = command.command_type() as u8;

    match command {
        Command::Produce { value } => frame(cmd_type, value),
        Command::Consume { offset } => frame(cmd_type, &offset.to_be_bytes()),
        Command::Ping => frame(cmd_type, &[]),
    }
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_byte, payload) = unframe(bytes, "command")?;

    let cmd_type = CommandType::try_from(cmd_byte).map_err(|b| {
        SeqlogError::Protocol(format!("Unknown command type: 0x{:02x}", b))
    })?;

    match cmd_type {
        CommandType::Produce => decode_produce_command(payload),
        CommandType::Consume => decode_consume_command(payload),
        CommandType::Ping => decode_ping_command(payload),
    }
}

/// Decode PRODUCE command payload
fn decode_produce_command(payload: &[u8]) -> Result<Command> {
    if payload.len() > MAX_VALUE_SIZE {
        return Err(SeqlogError::Protocol(format!(
            "PRODUCE command: value too large: {} bytes (max {})",
            payload.len(),
            MAX_VALUE_SIZE
        )));
    }
    Ok(Command::Produce {
        value: Bytes::copy_from_slice(payload),
    })
}

/// Decode CONSUME command payload
fn decode_consume_command(payload: &[u8]) -> Result<Command> {
    let offset_bytes: [u8; OFFSET_SIZE] = payload.try_into().map_err(|_| {
        SeqlogError::Protocol(format!(
            "CONSUME command: expected {} byte offset, got {} bytes",
            OFFSET_SIZE,
            payload.len()
        ))
    })?;

    Ok(Command::Consume {
        offset: u64::from_be_bytes(offset_bytes),
    })
}

/// Decode PING command payload
fn decode_ping_command(payload: &[u8]) -> Result<Command> {
    if !payload.is_empty() {
        return Err(SeqlogError::Protocol(format!(
            "PING command: unexpected payload of {} bytes",
            payload.len()
        )));
    }
    Ok(Command::Ping)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = unframe(bytes, "response")?;

    let status = Status::try_from(status_byte).map_err(|b| {
        SeqlogError::Protocol(format!("Unknown response status: 0x{:02x}", b))
    })?;

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete, undecoded command frame from a stream
///
/// A `Protocol` error here means the header was rejected and its payload
/// left unread, so the stream is no longer at a frame boundary.
pub fn read_command_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    read_frame(reader, "command")
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_command_frame(reader)?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader, "response")?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
