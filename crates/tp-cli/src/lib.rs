//! tp-cli: Command-line front end for tracker-pool
//!
//! Provides the `tracker-pool` binary for probing a tracker through the pool
//! and managing the configuration file.

pub mod commands;
pub mod output;
