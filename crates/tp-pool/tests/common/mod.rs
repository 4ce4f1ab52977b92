//! Shared helpers for pool integration tests
//!
//! Provides an in-memory connector whose behavior is scripted per test.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tp_core::config::PoolConfig;
use tp_core::error::ConnectionError;
use tp_core::traits::{Connector, TrackerConnection};
use tp_core::ConnectionId;

/// What a single `open` call should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Open {
    Connect,
    Absent,
    Fail,
}

/// State shared between a mock connector, its connections and the test
#[derive(Debug, Default)]
pub struct MockTracker {
    script: Mutex<VecDeque<Open>>,
    next_id: AtomicU64,
    pub opens: AtomicUsize,
    pub probes: AtomicUsize,
    failing: Mutex<HashSet<u64>>,
    fail_all_probes: AtomicBool,
    probe_delay: Mutex<Duration>,
    closed: Mutex<Vec<u64>>,
}

impl MockTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue outcomes for upcoming opens; once exhausted, opens connect
    pub fn script(&self, outcomes: impl IntoIterator<Item = Open>) {
        self.script.lock().unwrap().extend(outcomes);
    }

    /// Make probes on the given connection ids fail from now on
    pub fn fail_probes_for(&self, ids: impl IntoIterator<Item = u64>) {
        self.failing.lock().unwrap().extend(ids);
    }

    pub fn fail_all_probes(&self, fail: bool) {
        self.fail_all_probes.store(fail, Ordering::SeqCst);
    }

    /// Make every active test take `delay` before answering
    pub fn set_probe_delay(&self, delay: Duration) {
        *self.probe_delay.lock().unwrap() = delay;
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> Vec<u64> {
        self.closed.lock().unwrap().clone()
    }

    pub fn connector(self: &Arc<Self>) -> MockConnector {
        MockConnector {
            tracker: Arc::clone(self),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockConnector {
    tracker: Arc<MockTracker>,
}

#[async_trait]
impl Connector for MockConnector {
    type Conn = MockConnection;

    async fn open(&self) -> Result<Option<MockConnection>, ConnectionError> {
        self.tracker.opens.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .tracker
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Open::Connect);

        match outcome {
            Open::Connect => {
                let id = self.tracker.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Some(MockConnection {
                    id: ConnectionId::new(id),
                    tracker: Arc::clone(&self.tracker),
                    open: true,
                }))
            }
            Open::Absent => Ok(None),
            Open::Fail => Err(ConnectionError::Closed),
        }
    }
}

#[derive(Debug)]
pub struct MockConnection {
    id: ConnectionId,
    tracker: Arc<MockTracker>,
    open: bool,
}

#[async_trait]
impl TrackerConnection for MockConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn active_test(&mut self) -> Result<(), ConnectionError> {
        self.tracker.probes.fetch_add(1, Ordering::SeqCst);
        let delay = *self.tracker.probe_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failing = self.tracker.fail_all_probes.load(Ordering::SeqCst)
            || self.tracker.failing.lock().unwrap().contains(&self.id.as_u64());
        if !self.open || failing {
            return Err(ConnectionError::Closed);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        if self.open {
            self.open = false;
            self.tracker.closed.lock().unwrap().push(self.id.as_u64());
        }
        Ok(())
    }
}

/// Pool configuration with a long probe interval so the monitor stays quiet
pub fn pool_config(min: usize, max: usize) -> PoolConfig {
    PoolConfig::builder()
        .min_pool_size(min)
        .max_pool_size(max)
        .reconnect_attempts(3)
        .wait_timeout(Duration::from_secs(2))
        .probe_interval(Duration::from_secs(3600))
        .build()
        .unwrap()
}

/// Route pool logs to the test harness when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
