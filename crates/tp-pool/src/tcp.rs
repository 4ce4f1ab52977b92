//! TCP transport for tracker connections
//!
//! Each connection is a framed TCP stream speaking the tracker's binary
//! header protocol. Only the liveness probe and the polite quit are needed
//! by the pool.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;

use tp_core::error::ConnectionError;
use tp_core::traits::{Connector, TrackerConnection};
use tp_core::{ClientContext, ConnectionId};
use tp_protocol::{Packet, PacketCodec};

/// Opens plain TCP connections to the configured tracker
#[derive(Debug, Clone)]
pub struct TcpConnector {
    context: ClientContext,
}

impl TcpConnector {
    pub fn new(context: ClientContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Conn = TcpTrackerConnection;

    /// Connect failures and connect timeouts are reported as `Ok(None)` so the
    /// session factory can retry them.
    async fn open(&self) -> Result<Option<TcpTrackerConnection>, ConnectionError> {
        let address = self.context.tracker_address();
        let connect_timeout = self.context.connect_timeout();

        let stream = match timeout(connect_timeout, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                let e = ConnectionError::ConnectFailed {
                    address: address.to_string(),
                    source,
                };
                tracing::warn!(error = %e, "Tracker unreachable");
                return Ok(None);
            }
            Err(_) => {
                tracing::warn!(
                    tracker = %address,
                    timeout = ?connect_timeout,
                    "Connect to tracker timed out"
                );
                return Ok(None);
            }
        };

        stream.set_nodelay(true)?;
        let peer = stream.peer_addr().ok();
        let id = ConnectionId::next();

        tracing::debug!(conn = %id, tracker = %address, "Opened tracker connection");

        Ok(Some(TcpTrackerConnection {
            id,
            framed: Some(Framed::new(stream, PacketCodec::new())),
            network_timeout: self.context.network_timeout(),
            peer,
        }))
    }
}

/// A framed TCP connection to the tracker
#[derive(Debug)]
pub struct TcpTrackerConnection {
    id: ConnectionId,
    framed: Option<Framed<TcpStream, PacketCodec>>,
    network_timeout: Duration,
    peer: Option<SocketAddr>,
}

impl TcpTrackerConnection {
    /// Remote address, if it was known at connect time
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn is_closed(&self) -> bool {
        self.framed.is_none()
    }
}

#[async_trait]
impl TrackerConnection for TcpTrackerConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn active_test(&mut self) -> Result<(), ConnectionError> {
        let network_timeout = self.network_timeout;
        let framed = self.framed.as_mut().ok_or(ConnectionError::Closed)?;

        let round_trip = async {
            framed.send(Packet::active_test()).await?;
            let reply = framed.next().await.ok_or(ConnectionError::Closed)??;
            reply.expect_response(Some(0))?;
            Ok::<_, ConnectionError>(())
        };

        timeout(network_timeout, round_trip)
            .await
            .map_err(|_| ConnectionError::Timeout {
                operation: "active test",
                timeout: network_timeout,
            })?
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        let Some(mut framed) = self.framed.take() else {
            return Ok(());
        };

        let network_timeout = self.network_timeout;
        let quit = timeout(network_timeout, framed.send(Packet::quit()))
            .await
            .map_err(|_| ConnectionError::Timeout {
                operation: "quit",
                timeout: network_timeout,
            })
            .and_then(|sent| sent.map_err(ConnectionError::from));

        let mut stream = framed.into_inner();
        let shutdown = stream.shutdown().await;

        tracing::trace!(conn = %self.id, "Closed tracker connection");

        quit?;
        shutdown?;
        Ok(())
    }
}
