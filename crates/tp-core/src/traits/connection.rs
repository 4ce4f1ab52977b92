//! Connection traits
//!
//! These are the only capabilities the pool requires from the tracker client
//! library: open a connection, probe it, and close it.

use async_trait::async_trait;

use crate::error::ConnectionError;
use crate::types::ConnectionId;

/// A stateful handle to the tracker, owned by exactly one holder at a time
#[async_trait]
pub trait TrackerConnection: Send {
    /// Identity of this connection
    fn id(&self) -> ConnectionId;

    /// Lightweight liveness round-trip over the connection's transport
    async fn active_test(&mut self) -> Result<(), ConnectionError>;

    /// Close the underlying transport.
    ///
    /// Closing an already closed connection should succeed without effect.
    async fn close(&mut self) -> Result<(), ConnectionError>;
}

/// Opens new connections to the tracker
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector
    type Conn: TrackerConnection + 'static;

    /// Attempt to open a connection.
    ///
    /// `Ok(None)` means the attempt produced nothing and may be retried.
    async fn open(&self) -> Result<Option<Self::Conn>, ConnectionError>;
}
