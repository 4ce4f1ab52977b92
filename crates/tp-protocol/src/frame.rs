//! Packet header encoding/decoding
//!
//! Every packet uses a 10-byte header:
//! - body_length: 8 bytes (u64, big-endian)
//! - command: 1 byte (u8)
//! - status: 1 byte (u8, 0 = success)

use bytes::{Buf, BufMut, BytesMut};

use crate::command::{Command, Status};
use crate::error::ProtocolError;

/// Size of the packet header in bytes
pub const HEADER_SIZE: usize = 10;

/// Largest body the codec will buffer (16MB)
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Packet header containing command, status and body length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Length of the body following the header
    pub body_length: u64,
    /// Command of this packet
    pub command: Command,
    /// Status byte (meaningful on responses)
    pub status: Status,
}

impl PacketHeader {
    /// Create a new request header
    pub fn new(command: Command, body_length: u64) -> Self {
        Self {
            body_length,
            command,
            status: Status::OK,
        }
    }

    /// Create a header with an explicit status
    pub fn with_status(command: Command, body_length: u64, status: Status) -> Self {
        Self {
            body_length,
            command,
            status,
        }
    }

    /// Encode the header into a byte buffer
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(HEADER_SIZE);
        dst.put_u64(self.body_length);
        dst.put_u8(self.command.as_u8());
        dst.put_u8(self.status.0);
    }

    /// Decode a header from a byte buffer
    ///
    /// Returns None if there aren't enough bytes in the buffer.
    /// Returns Err if the command byte is unknown.
    pub fn decode(src: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        // Validate the command before consuming anything
        let command_byte = src[8];
        let command =
            Command::from_u8(command_byte).ok_or(ProtocolError::UnknownCommand(command_byte))?;

        let body_length = src.get_u64();
        let _ = src.get_u8(); // command already parsed
        let status = Status(src.get_u8());

        Ok(Some(Self {
            body_length,
            command,
            status,
        }))
    }
}
