//! Core partitioner trait definition.

/// A partitioner converts keys into positions on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// position generation without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a ring position.
    fn position(&self, key: &[u8]) -> u32;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
