//! tp-core: Core abstractions and configuration for tracker-pool
//!
//! This crate provides the configuration model, error taxonomy, and the
//! connection traits shared by the pool and the command-line front end.

pub mod config;
pub mod context;
pub mod error;
pub mod traits;
pub mod types;

pub use context::ClientContext;
pub use error::{ConfigError, ConnectionError, PoolError};
pub use types::ConnectionId;
