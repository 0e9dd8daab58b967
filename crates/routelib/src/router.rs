//! Key-to-node routing over an atomically swapped ring snapshot.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::info;

use crate::error::{Error, Result};
use crate::node::{NodeDescriptor, NodeId};
use crate::partitioner::{Partitioner, Xxh3Partitioner};
use crate::ring::{HashRing, RingBuilder};
use crate::topology::{ClusterTopology, TopologyDiff};

/// Routes keys to nodes and hands out registered per-node handles.
///
/// `C` is the caller's transport handle type (see
/// [`RequestService`](crate::service::RequestService) for the expected
/// contract); the router stores handles but never invokes them.
///
/// # Concurrency
///
/// The only mutable state is the current-ring reference. Readers clone
/// the `Arc` under a brief read lock and compute against that snapshot
/// lock-free; `update_topology` installs a whole new snapshot in one
/// write. A `route` call therefore never observes a half-updated ring,
/// and concurrent routes only disagree across an update boundary.
pub struct ClusterRouter<C> {
    builder: RingBuilder,
    partitioner: Xxh3Partitioner,
    ring: RwLock<Arc<HashRing>>,
    connections: DashMap<NodeId, Arc<C>>,
}

impl<C> ClusterRouter<C> {
    /// Build the initial ring from `topology` with default settings.
    pub fn new(topology: &ClusterTopology) -> Self {
        Self::with_builder(topology, RingBuilder::new())
    }

    /// Build the initial ring with a custom-configured builder.
    pub fn with_builder(topology: &ClusterTopology, builder: RingBuilder) -> Self {
        let ring = Arc::new(builder.build(topology));
        Self {
            builder,
            partitioner: Xxh3Partitioner,
            ring: RwLock::new(ring),
            connections: DashMap::new(),
        }
    }

    /// Current ring snapshot.
    pub fn ring(&self) -> Arc<HashRing> {
        Arc::clone(&self.ring.read())
    }

    /// Resolve the node owning `key`.
    ///
    /// Hashes the key with the same hash family used for ring points,
    /// then finds its successor on the snapshot current at call time.
    /// Deterministic: same key + same snapshot always yields the same
    /// node.
    pub fn route(&self, key: &[u8]) -> Result<NodeDescriptor> {
        let ring = self.ring();
        let position = self.partitioner.position(key);
        ring.lookup(position).cloned()
    }

    /// Rebuild the ring from `topology` and atomically install it.
    ///
    /// In-flight `route` calls complete against whichever snapshot they
    /// already observed. Returns the node diff so the caller can open
    /// handles for added nodes and retire handles for removed ones; the
    /// router itself opens and closes nothing.
    pub fn update_topology(&self, topology: &ClusterTopology) -> TopologyDiff {
        let next = Arc::new(self.builder.build(topology));
        let previous = {
            let mut slot = self.ring.write();
            std::mem::replace(&mut *slot, next)
        };
        let diff = TopologyDiff::between(previous.nodes(), topology.nodes());
        info!(
            nodes = topology.len(),
            added = diff.added.len(),
            removed = diff.removed.len(),
            "installed new ring snapshot"
        );
        diff
    }

    /// Handle registered for `node`.
    ///
    /// Fails with [`Error::NodeUnavailable`] when no handle is registered.
    /// The router never substitutes another node: key ownership is the
    /// whole contract the ring provides.
    pub fn connection_for(&self, node: &NodeId) -> Result<Arc<C>> {
        self.connections
            .get(node)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NodeUnavailable(node.clone()))
    }

    /// Register the transport handle for one node, replacing and
    /// returning any previous registration.
    ///
    /// Fails when `node` is not part of the current ring, so a stale or
    /// mistyped registration surfaces immediately instead of leaving the
    /// node set partially initialized.
    pub fn register_connection(&self, node: NodeId, handle: C) -> Result<Option<Arc<C>>> {
        if !self.ring().contains(&node) {
            return Err(Error::InvalidTopology(format!(
                "{node} is not part of the current topology"
            )));
        }
        Ok(self.connections.insert(node, Arc::new(handle)))
    }

    /// Remove the handle for `node`, returning it when present.
    pub fn deregister_connection(&self, node: &NodeId) -> Option<Arc<C>> {
        self.connections.remove(node).map(|(_, handle)| handle)
    }

    /// Nodes in the current ring with no registered handle.
    ///
    /// Routing resolves these nodes normally, but `connection_for` will
    /// fail for them until the caller registers a handle; checking this
    /// after applying a topology diff keeps initialization explicit.
    pub fn unconnected_nodes(&self) -> Vec<NodeDescriptor> {
        self.ring()
            .nodes()
            .iter()
            .filter(|n| !self.connections.contains_key(n.id()))
            .cloned()
            .collect()
    }
}
