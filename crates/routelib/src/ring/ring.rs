//! Hash ring snapshot and successor lookup.

use tracing::error;

use crate::error::{Error, Result};
use crate::node::{NodeDescriptor, NodeId};

/// One virtual point on the ring: a position owned by a node.
///
/// `node` indexes the ring's descriptor table instead of carrying the
/// descriptor itself, keeping the point array flat and cache-friendly for
/// a structure that is read on every request and rebuilt rarely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingPoint {
    pub position: u32,
    pub node: u32,
}

/// Immutable sorted ring mapping positions to owning nodes.
///
/// Built once per topology version by [`RingBuilder`]; superseded, never
/// mutated, on topology change. No mutation operations are exposed, so
/// concurrent readers need no locking.
///
/// [`RingBuilder`]: crate::ring::RingBuilder
#[derive(Clone, Debug)]
pub struct HashRing {
    nodes: Box<[NodeDescriptor]>,
    points: Box<[RingPoint]>,
}

impl HashRing {
    /// `points` must be sorted ascending by position with unique positions,
    /// and every `node` index must be in range for `nodes`.
    pub(crate) fn from_parts(nodes: Vec<NodeDescriptor>, points: Vec<RingPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].position < w[1].position));
        debug_assert!(points.iter().all(|p| (p.node as usize) < nodes.len()));
        Self {
            nodes: nodes.into_boxed_slice(),
            points: points.into_boxed_slice(),
        }
    }

    /// Owner of the first point at or after `position`.
    ///
    /// The ring is circular: when `position` exceeds every point, the
    /// owner of the smallest point wins. Binary search, O(log P).
    ///
    /// Fails only with [`Error::RingIntegrity`] on a zero-point ring,
    /// which the topology invariant makes unreachable through the builder.
    pub fn lookup(&self, position: u32) -> Result<&NodeDescriptor> {
        if self.points.is_empty() {
            error!("lookup against a ring with zero points");
            return Err(Error::RingIntegrity("ring has zero points".into()));
        }
        let idx = self.points.partition_point(|p| p.position < position);
        let point = self.points.get(idx).unwrap_or(&self.points[0]);
        Ok(&self.nodes[point.node as usize])
    }

    /// Total virtual points on the ring.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Physical nodes behind the ring.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    /// Sorted point array (inspection and testing aid).
    pub fn points(&self) -> &[RingPoint] {
        &self.points
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| n.id() == id)
    }

    /// Number of points owned by `id`.
    pub fn points_for(&self, id: &NodeId) -> usize {
        match self.nodes.iter().position(|n| n.id() == id) {
            Some(idx) => self
                .points
                .iter()
                .filter(|p| p.node as usize == idx)
                .count(),
            None => 0,
        }
    }
}
