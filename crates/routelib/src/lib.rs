//! Core library for consistent-hash request routing.
//!
//! This crate provides the building blocks for routing keyed requests
//! across a weighted cluster of backend storage nodes:
//! - Node identity and weight descriptors
//! - Point-in-time cluster topologies
//! - Weighted Ketama-style ring construction
//! - O(log P) ring lookup with wraparound
//! - A router holding an atomically swapped ring snapshot plus the
//!   per-node transport handle registry

pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod router;
pub mod service;
pub mod topology;

pub use error::{Error, Result};
pub use node::{NodeConfig, NodeDescriptor, NodeId};
pub use partitioner::{Partitioner, Xxh3Partitioner};
pub use ring::{HashRing, RingBuilder, RingPoint};
pub use router::ClusterRouter;
pub use service::{RequestService, ServiceError};
pub use topology::{ClusterTopology, TopologyDiff};
