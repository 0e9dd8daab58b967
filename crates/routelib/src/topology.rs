//! Cluster topology: the node set a ring is built from.
//!
//! A topology is captured at a moment in time and never edited; a change
//! to the cluster produces a new `ClusterTopology` which in turn produces
//! a new ring snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::{NodeDescriptor, NodeId};

/// Ordered, duplicate-free, non-empty set of node descriptors.
///
/// Iteration order is registration order; the ring builder relies on it
/// for its deterministic collision tie-break.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NodeDescriptor>", into = "Vec<NodeDescriptor>")]
pub struct ClusterTopology {
    nodes: Vec<NodeDescriptor>,
}

impl ClusterTopology {
    /// Validate and capture a node set.
    ///
    /// Fails with [`Error::InvalidTopology`] when `nodes` is empty or two
    /// descriptors share the same host + port identity. Failing here keeps
    /// the failure at configuration time instead of surfacing later as a
    /// degenerate ring.
    pub fn new(nodes: Vec<NodeDescriptor>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::InvalidTopology(
                "topology must contain at least one node".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(node.id().clone()) {
                return Err(Error::InvalidTopology(format!(
                    "duplicate node identity {}",
                    node.id()
                )));
            }
        }
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a constructed topology (the constructor rejects
    /// empty node sets); provided only to pair with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.iter()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| n.id() == id)
    }

    /// Sum of all node weights. Always positive given the descriptor
    /// validation rules.
    pub fn total_weight(&self) -> f64 {
        self.nodes.iter().map(|n| n.weight()).sum()
    }

    /// Nodes gained and lost going from `self` to `newer`.
    pub fn diff(&self, newer: &ClusterTopology) -> TopologyDiff {
        TopologyDiff::between(self.nodes(), newer.nodes())
    }
}

impl TryFrom<Vec<NodeDescriptor>> for ClusterTopology {
    type Error = Error;

    fn try_from(nodes: Vec<NodeDescriptor>) -> Result<Self> {
        Self::new(nodes)
    }
}

impl From<ClusterTopology> for Vec<NodeDescriptor> {
    fn from(topology: ClusterTopology) -> Self {
        topology.nodes
    }
}

/// Nodes added and removed between two topology versions.
///
/// The router reports this from `update_topology` so the caller can open
/// handles for added nodes and retire handles for removed ones; the
/// engine itself never manages connections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopologyDiff {
    pub added: Vec<NodeDescriptor>,
    pub removed: Vec<NodeDescriptor>,
}

impl TopologyDiff {
    /// Compare two node sets by identity.
    pub fn between(old: &[NodeDescriptor], new: &[NodeDescriptor]) -> Self {
        let added = new
            .iter()
            .filter(|n| !old.iter().any(|o| o.id() == n.id()))
            .cloned()
            .collect();
        let removed = old
            .iter()
            .filter(|o| !new.iter().any(|n| n.id() == o.id()))
            .cloned()
            .collect();
        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
