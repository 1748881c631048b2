//! CLI command implementations.

pub mod config;
pub mod run;

use std::path::PathBuf;

use clap::Args;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Scenario file (TOML, or JSON with a `.json` extension).
    pub scenario: PathBuf,

    /// Override the scenario's checkout timeout, in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    /// Store config file to merge over the defaults.
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}
