//! CLI command implementations

mod config;
mod probe;

pub use config::{config_init, config_path, config_show, config_validate, load_effective_config};
pub use probe::{probe_command, ProbeOptions, ProbeOutcome, ProbeSummary};
