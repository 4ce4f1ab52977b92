//! Connection pool implementation
//!
//! The pool owns a bounded buffer of idle, validated tracker connections.
//! A connection is always in exactly one place: the idle buffer, the hands of
//! a caller that checked it out, or the health monitor while it is probed.
//! Ownership moves by value between those places, so no connection can be
//! leased twice.
//!
//! The pool never grows on demand. Its population is set by the initial fill
//! at build time and only shrinks afterwards, through drops of failed or
//! surplus connections.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use tp_core::config::{Config, PoolConfig};
use tp_core::error::PoolError;
use tp_core::traits::{Connector, TrackerConnection};
use tp_core::ClientContext;

use super::buffer::{BufferClosed, IdleBuffer};
use super::factory::SessionFactory;
use super::health::{HealthMonitor, SweepReport};
use super::stats::{PoolCounters, PoolStats};
use crate::tcp::{TcpConnector, TcpTrackerConnection};

/// Pool over plain TCP tracker connections
pub type TcpPool = ConnectionPool<TcpTrackerConnection>;

/// State shared between the pool handle and its health monitor
#[derive(Debug)]
pub(crate) struct PoolShared<T> {
    pub idle: IdleBuffer<T>,
    pub counters: PoolCounters,
    pub config: PoolConfig,
}

/// Bounded pool of idle tracker connections
pub struct ConnectionPool<T> {
    shared: Arc<PoolShared<T>>,
    cancel: CancellationToken,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl<T: TrackerConnection + 'static> ConnectionPool<T> {
    /// Build a pool: allocate the idle buffer, open up to `min_pool_size`
    /// connections through the session factory, then start the health
    /// monitor.
    ///
    /// Only an invalid configuration fails the build. Connections the factory
    /// cannot produce are skipped, so the pool may start below `min_pool_size`.
    pub async fn build<C>(config: PoolConfig, connector: C) -> Result<Self, PoolError>
    where
        C: Connector<Conn = T>,
    {
        config.validate()?;

        let shared = Arc::new(PoolShared {
            idle: IdleBuffer::new(config.max_pool_size()),
            counters: PoolCounters::default(),
            config,
        });

        let factory = SessionFactory::new(connector, shared.config.reconnect_attempts());
        for _ in 0..shared.config.min_pool_size() {
            match factory.create().await {
                Some(conn) => {
                    PoolCounters::incr(&shared.counters.created);
                    if let Err(conn) = shared.idle.offer(conn) {
                        discard(conn, &shared.counters).await;
                    }
                }
                None => PoolCounters::incr(&shared.counters.create_failures),
            }
        }

        tracing::info!(
            idle = shared.idle.len(),
            min = shared.config.min_pool_size(),
            max = shared.config.max_pool_size(),
            "Connection pool built"
        );

        let cancel = CancellationToken::new();
        let monitor = HealthMonitor::new(Arc::clone(&shared)).spawn(cancel.clone());

        Ok(Self {
            shared,
            cancel,
            monitor: Mutex::new(Some(monitor)),
        })
    }

    /// Take an idle connection, waiting up to the configured wait timeout.
    ///
    /// `Ok(None)` means nothing became available in time. New connections are
    /// never opened here. Fails with [`PoolError::Interrupted`] if the pool is
    /// shut down while waiting.
    pub async fn check_out(&self) -> Result<Option<T>, PoolError> {
        let wait = self.shared.config.wait_timeout();

        match self.shared.idle.pop(wait).await {
            Ok(Some(conn)) => {
                PoolCounters::incr(&self.shared.counters.checked_out);
                tracing::debug!(conn = %conn.id(), "Checked out connection");
                Ok(Some(conn))
            }
            Ok(None) => {
                tracing::debug!(?wait, "No idle connection within wait window");
                Ok(None)
            }
            Err(BufferClosed) => {
                tracing::error!("Checkout interrupted: pool is shutting down");
                Err(PoolError::Interrupted)
            }
        }
    }

    /// Return a connection to the idle buffer, or drop it if there is no room
    pub async fn check_in(&self, conn: T) {
        PoolCounters::incr(&self.shared.counters.checked_in);
        let id = conn.id();

        match self.shared.idle.offer(conn) {
            Ok(()) => tracing::debug!(conn = %id, "Checked in connection"),
            Err(conn) => {
                tracing::debug!(conn = %id, "Idle buffer full or closed, dropping connection");
                discard(conn, &self.shared.counters).await;
            }
        }
    }

    /// Close a connection and forget it. Close failures are logged only.
    pub async fn drop_connection(&self, conn: T) {
        discard(conn, &self.shared.counters).await;
    }

    /// Run one health sweep now, outside the monitor's schedule
    pub async fn run_health_sweep(&self) -> SweepReport {
        HealthMonitor::new(Arc::clone(&self.shared)).sweep().await
    }

    /// Connections currently idle
    pub fn idle_count(&self) -> usize {
        self.shared.idle.len()
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// Snapshot of pool counters
    pub fn stats(&self) -> PoolStats {
        self.shared
            .counters
            .snapshot(self.shared.idle.len(), self.shared.idle.capacity())
    }

    /// Stop the health monitor, wake blocked checkouts with
    /// [`PoolError::Interrupted`] and close every idle connection.
    ///
    /// Connections held by callers at this point are dropped when they are
    /// checked back in.
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let monitor = self
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = monitor {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    tracing::error!("Health monitor panicked: {}", e);
                }
            }
        }

        self.shared.idle.close();
        let idle = self.shared.idle.drain();
        let closed = idle.len();
        for conn in idle {
            discard(conn, &self.shared.counters).await;
        }

        tracing::info!(closed, "Connection pool shut down");
    }
}

impl ConnectionPool<TcpTrackerConnection> {
    /// Initialize the tracker client from `config.client` and build a TCP
    /// pool from `config.pool`.
    ///
    /// An invalid client configuration is fatal and reported as
    /// [`PoolError::Init`].
    pub async fn connect(config: &Config) -> Result<Self, PoolError> {
        let context = ClientContext::init(&config.client)?;
        Self::build(config.pool.clone(), TcpConnector::new(context)).await
    }
}

impl<T> Drop for ConnectionPool<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Close a connection best-effort and count it as dropped
pub(crate) async fn discard<T: TrackerConnection>(mut conn: T, counters: &PoolCounters) {
    PoolCounters::incr(&counters.dropped);
    let id = conn.id();

    match conn.close().await {
        Ok(()) => tracing::debug!(conn = %id, "Dropped connection"),
        Err(e) => tracing::warn!(conn = %id, error = %e, "Closing dropped connection failed"),
    }
}
