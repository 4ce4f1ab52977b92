//! Connection management

mod buffer;
mod factory;
mod health;
mod pool;
mod stats;

pub use buffer::{BufferClosed, IdleBuffer};
pub use factory::SessionFactory;
pub use health::SweepReport;
pub use pool::{ConnectionPool, TcpPool};
pub use stats::PoolStats;
