//! Probe command implementation
//!
//! Builds a pool against the configured tracker, pushes a batch of liveness
//! probes through the executor and reports how each one went.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::{FutureExt, StreamExt};
use serde::Serialize;

use crate::output::{format_pool_stats, format_probe_results, print_warning};
use tp_core::config::Config;
use tp_core::traits::TrackerConnection;
use tp_pool::{Executor, PoolStats, TcpPool, TcpTrackerConnection};

/// How many probes to run and how
#[derive(Debug, Clone, Copy)]
pub struct ProbeOptions {
    pub count: usize,
    pub concurrency: usize,
    pub json: bool,
}

/// Result of a single probe
#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    pub index: usize,
    /// Connection the probe ran on, if one was checked out
    pub connection: Option<String>,
    #[serde(rename = "elapsed_ms", serialize_with = "millis")]
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_micros() as f64 / 1000.0)
}

/// Everything a probe run produced
#[derive(Debug, Clone, Serialize)]
pub struct ProbeSummary {
    pub probes: Vec<ProbeOutcome>,
    pub stats: PoolStats,
}

impl ProbeSummary {
    pub fn succeeded(&self) -> usize {
        self.probes.iter().filter(|p| p.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.probes.len() - self.succeeded()
    }
}

/// Execute the probe command
pub async fn probe_command(config: &Config, options: ProbeOptions) -> Result<ProbeSummary> {
    let pool = Arc::new(
        TcpPool::connect(config)
            .await
            .context("Failed to build connection pool")?,
    );

    if pool.idle_count() == 0 {
        print_warning(&format!(
            "No connection to tracker {} could be opened",
            config.client.tracker_server
        ));
    }

    let executor = Executor::new(Arc::clone(&pool));
    let mut probes: Vec<ProbeOutcome> = futures::stream::iter(0..options.count)
        .map(|index| run_probe(executor.clone(), index))
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;
    probes.sort_by_key(|p| p.index);

    let stats = pool.stats();
    pool.shutdown().await;

    let summary = ProbeSummary { probes, stats };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", format_probe_results(&summary.probes));
        println!();
        println!("{}", format_pool_stats(&summary.stats));
        println!(
            "\n{} of {} probes succeeded",
            summary.succeeded(),
            summary.probes.len()
        );
    }

    Ok(summary)
}

async fn run_probe(executor: Executor<TcpTrackerConnection>, index: usize) -> ProbeOutcome {
    let started = Instant::now();

    let result = executor
        .run(|conn: &mut TcpTrackerConnection| {
            async move {
                conn.active_test().await?;
                Ok::<_, tp_core::ConnectionError>(conn.id())
            }
            .boxed()
        })
        .await;

    let elapsed = started.elapsed();
    match result {
        Ok(id) => ProbeOutcome {
            index,
            connection: Some(id.to_string()),
            elapsed,
            error: None,
        },
        Err(e) => {
            tracing::debug!(index, error = %e, "Probe failed");
            ProbeOutcome {
                index,
                connection: None,
                elapsed,
                error: Some(e.to_string()),
            }
        }
    }
}
