//! Command and status codes for the tracker protocol
//!
//! Every packet starts with a header naming a command. Requests use a
//! request command (`ActiveTest`, `Quit`) and the tracker always answers with
//! `Response`, carrying the outcome in the header's status byte.
//!
//! # Exchanges used by the pool
//!
//! 1. Liveness probe: client sends `ActiveTest` with an empty body, tracker
//!    replies `Response` with status 0 and an empty body.
//! 2. Disconnect: client sends `Quit` with an empty body and closes the
//!    socket without waiting for a reply.

/// Command identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Ask the peer to close the connection
    Quit = 82,
    /// Generic response to any request
    Response = 100,
    /// Liveness probe
    ActiveTest = 111,
}

impl Command {
    /// Convert to u8
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            82 => Some(Self::Quit),
            100 => Some(Self::Response),
            111 => Some(Self::ActiveTest),
            _ => None,
        }
    }
}

/// Status byte carried in a response header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Request succeeded
    pub const OK: Status = Status(0);

    /// Whether the status reports success
    pub fn is_ok(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::OK
    }
}
