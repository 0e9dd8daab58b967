//! Subcommand implementations.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use routelib::{ClusterRouter, ClusterTopology, NodeId};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Route one key and print the owning node.
    Route {
        /// Topology JSON file.
        #[arg(long)]
        topology: PathBuf,
        /// Key to route.
        key: String,
    },
    /// Sample many keys and print the per-node share.
    Distribution {
        /// Topology JSON file.
        #[arg(long)]
        topology: PathBuf,
        /// Number of sample keys.
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
    /// Show how many sampled keys change owner between two topologies.
    Diff {
        /// Topology JSON file before the change.
        #[arg(long)]
        from: PathBuf,
        /// Topology JSON file after the change.
        #[arg(long)]
        to: PathBuf,
        /// Number of sample keys.
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
}

impl Command {
    pub fn execute(self) -> anyhow::Result<()> {
        match self {
            Command::Route { topology, key } => {
                let router = router_for(&topology)?;
                let node = router.route(key.as_bytes())?;
                println!("{key} -> {node}");
            }
            Command::Distribution { topology, samples } => {
                anyhow::ensure!(samples > 0, "--samples must be at least 1");
                let router = router_for(&topology)?;
                let mut counts: HashMap<NodeId, usize> = HashMap::new();
                for key in sample_keys(samples) {
                    let node = router.route(&key)?;
                    *counts.entry(node.id().clone()).or_default() += 1;
                }

                let mut rows: Vec<_> = counts.into_iter().collect();
                rows.sort_by(|a, b| b.1.cmp(&a.1));
                for (node, count) in rows {
                    let percent = 100.0 * count as f64 / samples as f64;
                    println!("{node}\t{count}\t{percent:.1}%");
                }
            }
            Command::Diff { from, to, samples } => {
                anyhow::ensure!(samples > 0, "--samples must be at least 1");
                let before = router_for(&from)?;
                let after = router_for(&to)?;

                let mut moved = 0usize;
                for key in sample_keys(samples) {
                    if before.route(&key)?.id() != after.route(&key)?.id() {
                        moved += 1;
                    }
                }
                let percent = 100.0 * moved as f64 / samples as f64;
                println!("{moved}/{samples} keys move ({percent:.1}%)");
            }
        }
        Ok(())
    }
}

fn router_for(path: &Path) -> anyhow::Result<ClusterRouter<()>> {
    let topology = load_topology(path)?;
    Ok(ClusterRouter::new(&topology))
}

fn load_topology(path: &Path) -> anyhow::Result<ClusterTopology> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading topology file {}", path.display()))?;
    let topology: ClusterTopology =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(topology)
}

fn sample_keys(count: usize) -> impl Iterator<Item = Vec<u8>> {
    (0..count).map(|i| format!("key-{i}").into_bytes())
}
