//! Protocol error types

use thiserror::Error;

use crate::command::Command;

/// Errors that can occur during protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Unknown command byte in a header
    #[error("Unknown command: {0}")]
    UnknownCommand(u8),

    /// Body exceeds maximum size
    #[error("Body too large: {size} bytes exceeds maximum of {max} bytes")]
    BodyTooLarge { size: u64, max: usize },

    /// Reply carried a different command than expected
    #[error("Unexpected command: expected {expected:?}, got {actual:?}")]
    UnexpectedCommand { expected: Command, actual: Command },

    /// Reply body length does not match what the request implies
    #[error("Unexpected body length: expected {expected} bytes, got {actual}")]
    UnexpectedBodyLength { expected: usize, actual: usize },

    /// Tracker answered with a non-zero status (remote errno)
    #[error("Tracker returned status {0}")]
    RemoteStatus(u8),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
