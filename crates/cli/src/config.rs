//! Command-line configuration and entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

/// Inspect consistent-hash routing for a cluster topology.
///
/// Topology files are JSON arrays of nodes:
/// `[{"host": "n1", "port": 6379, "weight": 2.0}, ...]`
#[derive(Debug, Parser)]
#[command(name = "ringctl", version, about)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
        self.command.execute()
    }
}
