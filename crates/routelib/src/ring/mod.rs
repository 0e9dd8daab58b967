//! Consistent hash ring: immutable snapshot plus weighted builder.
//!
//! The ring manages virtual point positions and provides efficient
//! successor lookup for finding the node responsible for a position.

pub mod builder;
pub mod ring;

pub use builder::{RingBuilder, DEFAULT_POINTS_PER_NODE};
pub use ring::{HashRing, RingPoint};
