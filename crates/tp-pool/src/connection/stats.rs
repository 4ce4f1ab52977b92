//! Pool activity counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by the pool, the monitor and the executor
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub created: AtomicU64,
    pub create_failures: AtomicU64,
    pub checked_out: AtomicU64,
    pub checked_in: AtomicU64,
    pub dropped: AtomicU64,
    pub probes: AtomicU64,
    pub probe_failures: AtomicU64,
    pub sweeps: AtomicU64,
}

impl PoolCounters {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, idle: usize, capacity: usize) -> PoolStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        PoolStats {
            idle,
            capacity,
            created: load(&self.created),
            create_failures: load(&self.create_failures),
            checked_out: load(&self.checked_out),
            checked_in: load(&self.checked_in),
            dropped: load(&self.dropped),
            probes: load(&self.probes),
            probe_failures: load(&self.probe_failures),
            sweeps: load(&self.sweeps),
        }
    }
}

/// Point-in-time view of pool activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Connections currently idle in the buffer
    pub idle: usize,
    /// Idle buffer capacity
    pub capacity: usize,
    /// Connections opened and validated by the session factory
    pub created: u64,
    /// Factory calls that produced no connection
    pub create_failures: u64,
    /// Successful checkouts
    pub checked_out: u64,
    /// Check-in calls (including ones that ended in a drop because the buffer was full)
    pub checked_in: u64,
    /// Connections closed and discarded
    pub dropped: u64,
    /// Health probes issued by the monitor
    pub probes: u64,
    /// Health probes that failed
    pub probe_failures: u64,
    /// Completed health sweeps
    pub sweeps: u64,
}
