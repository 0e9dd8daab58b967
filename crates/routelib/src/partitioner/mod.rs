//! Key-to-position hashing for the ring.
//!
//! Partitioners are responsible for converting keys into positions
//! that can be placed on the hash ring. Ring points and routed keys
//! must use the same hash family, so both live here.

pub mod traits;
pub mod xxh3;

pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;
