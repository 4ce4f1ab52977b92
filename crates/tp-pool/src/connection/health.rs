//! Connection health monitoring
//!
//! A background task that periodically cycles every idle connection through
//! a liveness probe. Connections that pass go back to the end of the idle
//! buffer; connections that fail are closed and discarded.

use std::sync::Arc;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use tp_core::traits::TrackerConnection;

use super::pool::{discard, PoolShared};
use super::stats::PoolCounters;

/// Outcome of one health sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Connections popped and probed
    pub probed: usize,
    /// Connections that failed the probe and were dropped
    pub failed: usize,
    /// Connections that passed but found no room to be re-admitted
    pub evicted: usize,
}

/// Probes idle connections on a fixed cadence
pub(crate) struct HealthMonitor<T> {
    shared: Arc<PoolShared<T>>,
}

impl<T: TrackerConnection + 'static> HealthMonitor<T> {
    pub fn new(shared: Arc<PoolShared<T>>) -> Self {
        Self { shared }
    }

    /// Start the periodic sweep task; it runs until `cancel` fires
    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    async fn run(self, cancel: CancellationToken) {
        let interval = self.shared.config.probe_interval();
        // The initial fill was just probed by the factory; first sweep waits a full interval.
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(?interval, "Health monitor started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Health monitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }
    }

    /// Probe every connection that was idle when the sweep started.
    ///
    /// Each pop waits at most the pool's wait timeout; an empty pop ends the
    /// sweep early. The buffer lock is only held per pop and per offer.
    pub async fn sweep(&self) -> SweepReport {
        let pending = self.shared.idle.len();
        let wait = self.shared.config.wait_timeout();
        let counters = &self.shared.counters;
        let mut report = SweepReport::default();

        for _ in 0..pending {
            let mut conn = match self.shared.idle.pop(wait).await {
                Ok(Some(conn)) => conn,
                // Drained by callers, or the pool is closing
                Ok(None) | Err(_) => break,
            };

            report.probed += 1;
            PoolCounters::incr(&counters.probes);
            let id = conn.id();

            match conn.active_test().await {
                Ok(()) => {
                    if let Err(conn) = self.shared.idle.offer(conn) {
                        report.evicted += 1;
                        tracing::debug!(conn = %id, "No room to re-admit probed connection");
                        discard(conn, counters).await;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    PoolCounters::incr(&counters.probe_failures);
                    tracing::warn!(conn = %id, error = %e, "Idle connection failed probe, dropping");
                    discard(conn, counters).await;
                }
            }
        }

        PoolCounters::incr(&counters.sweeps);
        let idle = self.shared.idle.len();
        tracing::debug!(
            probed = report.probed,
            failed = report.failed,
            idle,
            "Health sweep complete"
        );

        if report.failed > 0 && idle == 0 {
            tracing::warn!(
                "Idle buffer is empty after health sweep; the pool does not open replacement connections"
            );
        }

        report
    }
}
