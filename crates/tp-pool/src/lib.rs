//! tp-pool: Bounded, health-checked pool of tracker connections
//!
//! A [`ConnectionPool`] is filled once at build time through a
//! [`SessionFactory`], keeps at most `max_pool_size` idle connections, and
//! runs a background health monitor that probes every idle connection on a
//! fixed interval. An [`Executor`] runs units of work against checked-out
//! connections and decides whether each connection is returned or dropped.

pub mod connection;
pub mod executor;
pub mod tcp;

pub use connection::{ConnectionPool, PoolStats, SessionFactory, SweepReport, TcpPool};
pub use executor::Executor;
pub use tcp::{TcpConnector, TcpTrackerConnection};
