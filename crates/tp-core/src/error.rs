//! Core error types for tracker-pool

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tp_protocol::ProtocolError;

/// Boxed error produced by caller-supplied work
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the pool to its callers.
///
/// Transport failures on individual connections never appear here; they are
/// resolved by dropping the connection.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Client initialization failed while building the pool
    #[error("Pool initialization failed: {0}")]
    Init(#[from] ConfigError),

    /// No idle connection became available within the wait window
    #[error("No tracker connection available within {0:?}")]
    NoConnection(Duration),

    /// The pool was shut down while a caller was waiting for a connection
    #[error("Wait for a tracker connection was interrupted")]
    Interrupted,

    /// Caller-supplied work returned an error
    #[error("Unit of work failed: {0}")]
    Work(#[source] BoxError),

    /// Caller-supplied work panicked
    #[error("Unit of work panicked: {0}")]
    WorkPanicked(String),
}

/// Per-connection errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Could not establish the TCP connection
    #[error("Connect to {address} failed: {source}")]
    ConnectFailed {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation did not complete in time
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// Peer violated the protocol or returned a failure status
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Connection was already closed (locally or by the peer)
    #[error("Connection closed")]
    Closed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}
