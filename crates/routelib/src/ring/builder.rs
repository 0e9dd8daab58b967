//! Weighted Ketama-style ring construction.
//!
//! # Algorithm
//!
//! 1. Compute the average node weight across the topology.
//! 2. Give each node `round(base * weight / avg_weight)` virtual points
//!    (floored at one), so a node's share of the ring tracks its weight
//!    relative to the cluster average.
//! 3. Generate positions by hashing `host:port:replica` labels; each
//!    128-bit digest is consumed as four 32-bit positions.
//! 4. On an exact position collision the later node in topology order
//!    wins the slot.
//! 5. Sort ascending and freeze the snapshot.
//!
//! The point of the ring (versus a modulo-N scheme) is minimal
//! disruption: adding or removing a node moves only that node's points,
//! leaving every other key-to-node assignment intact.

use tracing::debug;

use crate::partitioner::Xxh3Partitioner;
use crate::ring::ring::{HashRing, RingPoint};
use crate::topology::ClusterTopology;

/// Base number of ring points for a node of average weight.
///
/// 160 points per node keeps the per-node share within a few percent of
/// its weighted target for typical cluster sizes.
pub const DEFAULT_POINTS_PER_NODE: usize = 160;

/// Pure function from [`ClusterTopology`] to [`HashRing`].
///
/// # Example
///
/// ```rust
/// use routelib::{ClusterTopology, NodeDescriptor, RingBuilder};
///
/// let topology = ClusterTopology::new(vec![
///     NodeDescriptor::new("n1", 6379).unwrap(),
///     NodeDescriptor::with_weight("n2", 6379, 2.0).unwrap(),
/// ])
/// .unwrap();
///
/// let ring = RingBuilder::new().build(&topology);
/// assert_eq!(ring.node_count(), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RingBuilder {
    points_per_node: usize,
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            points_per_node: DEFAULT_POINTS_PER_NODE,
        }
    }

    /// Override the base point count. Lower is coarser; mostly useful in
    /// tests and benchmarks.
    pub fn points_per_node(mut self, base: usize) -> Self {
        self.points_per_node = base.max(1);
        self
    }

    /// Place every node's weighted points and freeze the sorted ring.
    ///
    /// Infallible: the topology invariant guarantees at least one node,
    /// and every node receives at least one point.
    pub fn build(&self, topology: &ClusterTopology) -> HashRing {
        let avg_weight = topology.total_weight() / topology.len() as f64;

        let mut points = Vec::with_capacity(topology.len() * self.points_per_node);
        for (idx, node) in topology.iter().enumerate() {
            let count = points_for_node(self.points_per_node, node.weight(), avg_weight);
            place_points(&mut points, node.id().to_string().as_bytes(), idx as u32, count);
            debug!(node = %node.id(), weight = node.weight(), points = count, "placed ring points");
        }

        let points = freeze(points);
        HashRing::from_parts(topology.nodes().to_vec(), points)
    }
}

/// Target point count for one node: proportional to its weight relative
/// to the cluster average, never below one so every node stays routable.
fn points_for_node(base: usize, weight: f64, avg_weight: f64) -> usize {
    let scaled = (base as f64 * weight / avg_weight).round() as usize;
    scaled.max(1)
}

/// Append `count` positions for one node, four per digest.
fn place_points(points: &mut Vec<RingPoint>, identity: &[u8], node: u32, count: usize) {
    let mut placed = 0;
    let mut replica = 0u32;
    while placed < count {
        let mut label = Vec::with_capacity(identity.len() + 11);
        label.extend_from_slice(identity);
        label.push(b':');
        label.extend_from_slice(replica.to_string().as_bytes());

        for position in Xxh3Partitioner::replica_positions(&label) {
            if placed == count {
                break;
            }
            points.push(RingPoint { position, node });
            placed += 1;
        }
        replica += 1;
    }
}

/// Sort and resolve exact position collisions: the later node in topology
/// iteration order keeps the slot.
fn freeze(mut points: Vec<RingPoint>) -> Vec<RingPoint> {
    points.sort_by(|a, b| a.position.cmp(&b.position).then(b.node.cmp(&a.node)));
    points.dedup_by_key(|p| p.position);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeDescriptor;

    #[test]
    fn test_points_for_node_tracks_relative_weight() {
        // avg weight 2.0: a weight-1 node gets half the base, weight-4 double.
        assert_eq!(points_for_node(160, 2.0, 2.0), 160);
        assert_eq!(points_for_node(160, 1.0, 2.0), 80);
        assert_eq!(points_for_node(160, 4.0, 2.0), 320);
    }

    #[test]
    fn test_points_for_node_floors_at_one() {
        assert_eq!(points_for_node(160, 0.0001, 100.0), 1);
    }

    #[test]
    fn test_freeze_later_node_wins_collision() {
        let raw = vec![
            RingPoint { position: 100, node: 0 },
            RingPoint { position: 100, node: 1 },
            RingPoint { position: 50, node: 0 },
        ];
        let frozen = freeze(raw);
        assert_eq!(
            frozen,
            vec![
                RingPoint { position: 50, node: 0 },
                RingPoint { position: 100, node: 1 },
            ]
        );
    }

    #[test]
    fn test_freeze_is_sorted_and_unique() {
        let raw = vec![
            RingPoint { position: 9, node: 2 },
            RingPoint { position: 3, node: 1 },
            RingPoint { position: 9, node: 0 },
            RingPoint { position: 1, node: 2 },
        ];
        let frozen = freeze(raw);
        assert!(frozen.windows(2).all(|w| w[0].position < w[1].position));
        assert_eq!(frozen.len(), 3);
        // node 2 inserted after node 0 at position 9, so it wins.
        assert_eq!(frozen[2], RingPoint { position: 9, node: 2 });
    }

    #[test]
    fn test_build_weighted_point_counts() {
        let topology = ClusterTopology::new(vec![
            NodeDescriptor::with_weight("n1", 6379, 1.0).unwrap(),
            NodeDescriptor::with_weight("n2", 6379, 3.0).unwrap(),
        ])
        .unwrap();

        let ring = RingBuilder::new().build(&topology);
        let n1 = ring.points_for(&crate::node::NodeId::new("n1", 6379));
        let n2 = ring.points_for(&crate::node::NodeId::new("n2", 6379));

        // avg weight 2.0 -> targets 80 and 240; exact collisions are the
        // only thing that could shave a point off.
        assert!((79..=80).contains(&n1), "n1 points: {n1}");
        assert!((239..=240).contains(&n2), "n2 points: {n2}");
    }

    #[test]
    fn test_build_is_deterministic() {
        let topology = ClusterTopology::new(vec![
            NodeDescriptor::new("n1", 6379).unwrap(),
            NodeDescriptor::new("n2", 6379).unwrap(),
        ])
        .unwrap();

        let a = RingBuilder::new().build(&topology);
        let b = RingBuilder::new().build(&topology);
        assert_eq!(a.points(), b.points());
    }
}
