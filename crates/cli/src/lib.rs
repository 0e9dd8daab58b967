//! CLI tool for inspecting consistent-hash routing.
//!
//! Provides commands for:
//! - Routing single keys against a topology
//! - Measuring key distribution across nodes
//! - Measuring key movement between two topologies

pub mod commands;
pub mod config;

pub use commands::Command;
pub use config::CliConfig;
