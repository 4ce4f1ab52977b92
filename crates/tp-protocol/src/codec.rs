//! Tokio codec for framed tracker packets

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::command::{Command, Status};
use crate::error::ProtocolError;
use crate::frame::{PacketHeader, MAX_BODY_SIZE};

/// A complete packet with header fields and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Command of this packet
    pub command: Command,
    /// Status byte (0 on requests)
    pub status: Status,
    /// Raw body bytes
    pub body: Bytes,
}

impl Packet {
    /// Create a request packet with an empty body
    pub fn new(command: Command) -> Self {
        Self {
            command,
            status: Status::OK,
            body: Bytes::new(),
        }
    }

    /// Liveness probe request
    pub fn active_test() -> Self {
        Self::new(Command::ActiveTest)
    }

    /// Disconnect request
    pub fn quit() -> Self {
        Self::new(Command::Quit)
    }

    /// Response packet, as a tracker would send it
    pub fn response(status: Status, body: Bytes) -> Self {
        Self {
            command: Command::Response,
            status,
            body,
        }
    }

    /// Validate this packet as the reply to a request and return its body.
    ///
    /// The command must be `Response` and the status must be 0. When
    /// `expected_body_len` is given the body must have exactly that length.
    pub fn expect_response(self, expected_body_len: Option<usize>) -> Result<Bytes, ProtocolError> {
        if self.command != Command::Response {
            return Err(ProtocolError::UnexpectedCommand {
                expected: Command::Response,
                actual: self.command,
            });
        }

        if !self.status.is_ok() {
            return Err(ProtocolError::RemoteStatus(self.status.0));
        }

        if let Some(expected) = expected_body_len {
            if self.body.len() != expected {
                return Err(ProtocolError::UnexpectedBodyLength {
                    expected,
                    actual: self.body.len(),
                });
            }
        }

        Ok(self.body)
    }
}

/// Codec for encoding/decoding tracker packets
#[derive(Debug, Default)]
pub struct PacketCodec {
    /// Current header being decoded (if any)
    pending_header: Option<PacketHeader>,
}

impl PacketCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self {
            pending_header: None,
        }
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let header = match self.pending_header.take() {
            Some(h) => h,
            None => match PacketHeader::decode(src)? {
                Some(h) => h,
                None => return Ok(None), // Need more data
            },
        };

        if header.body_length > MAX_BODY_SIZE as u64 {
            return Err(ProtocolError::BodyTooLarge {
                size: header.body_length,
                max: MAX_BODY_SIZE,
            });
        }
        let body_len = header.body_length as usize;

        if src.len() < body_len {
            src.reserve(body_len - src.len());
            self.pending_header = Some(header);
            return Ok(None);
        }

        let body = src.split_to(body_len).freeze();
        tracing::trace!(command = ?header.command, status = header.status.0, body_len, "decoded packet");

        Ok(Some(Packet {
            command: header.command,
            status: header.status,
            body,
        }))
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let body_len = packet.body.len();
        if body_len > MAX_BODY_SIZE {
            return Err(ProtocolError::BodyTooLarge {
                size: body_len as u64,
                max: MAX_BODY_SIZE,
            });
        }

        let header = PacketHeader::with_status(packet.command, body_len as u64, packet.status);
        header.encode(dst);
        dst.extend_from_slice(&packet.body);

        Ok(())
    }
}
