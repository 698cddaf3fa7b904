//! Blocking client
//!
//! Speaks the framed protocol over a single TCP connection.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Result, SeqlogError};
use crate::log::Record;
use crate::protocol::{
    read_response, write_command, Command, Response, Status, MAX_VALUE_SIZE,
};

/// Client connection to a SeqLog server
///
/// A transport or framing failure mid-request leaves the stream at an
/// unknown position, so the client refuses all later requests once one
/// has happened. Reconnect to continue.
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    broken: bool,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| SeqlogError::Network(format!("connect failed: {}", e)))?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            broken: false,
        })
    }

    /// Bound how long a single request may wait on the socket
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    /// Append a record and return its offset
    ///
    /// Values over [`MAX_VALUE_SIZE`] are rejected locally with a
    /// `Protocol` error; nothing is sent and the client stays usable.
    pub fn produce(&mut self, value: impl Into<Bytes>) -> Result<u64> {
        let value = value.into();
        if value.len() > MAX_VALUE_SIZE {
            return Err(SeqlogError::Protocol(format!(
                "value too large: {} bytes (max {})",
                value.len(),
                MAX_VALUE_SIZE
            )));
        }

        let response = self.round_trip(&Command::Produce { value })?;

        let payload = Self::expect_ok(response, None)?;
        let bytes: [u8; 8] = payload.as_slice().try_into().map_err(|_| {
            SeqlogError::Protocol(format!(
                "PRODUCE response: expected 8 byte offset, got {} bytes",
                payload.len()
            ))
        })?;

        Ok(u64::from_be_bytes(bytes))
    }

    /// Fetch the record stored at `offset`
    pub fn consume(&mut self, offset: u64) -> Result<Record> {
        let response = self.round_trip(&Command::Consume { offset })?;
        let payload = Self::expect_ok(response, Some(offset))?;
        Record::from_bytes(&payload)
    }

    /// Health check
    pub fn ping(&mut self) -> Result<()> {
        let response = self.round_trip(&Command::Ping)?;
        Self::expect_ok(response, None).map(|_| ())
    }

    /// Check whether an earlier failure made this connection unusable
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    fn round_trip(&mut self, command: &Command) -> Result<Response> {
        if self.broken {
            return Err(SeqlogError::Network(
                "connection unusable after an earlier transport error".to_string(),
            ));
        }

        let result = write_command(&mut self.writer, command)
            .and_then(|()| read_response(&mut self.reader));
        if result.is_err() {
            self.broken = true;
        }
        result
    }

    /// Turn a non-OK status back into the matching error
    fn expect_ok(response: Response, offset: Option<u64>) -> Result<Vec<u8>> {
        match response.status {
            Status::Ok => Ok(response.payload.unwrap_or_default()),
            Status::NotFound => match offset {
                Some(offset) => Err(SeqlogError::OffsetNotFound { offset }),
                None => Err(SeqlogError::Protocol(
                    "unexpected NOT_FOUND response".to_string(),
                )),
            },
            Status::Error => Err(SeqlogError::Server(response.message())),
            Status::BadRequest => Err(SeqlogError::Protocol(response.message())),
        }
    }
}
