//! xxh3-backed partitioner with Ketama-style digest chunking.

use xxhash_rust::xxh3::xxh3_128;

use crate::partitioner::traits::Partitioner;

/// Partitioner over the 128-bit xxh3 digest.
///
/// One digest yields four independent 32-bit ring positions, the classic
/// Ketama trick of amortizing several points per hash computation. Key
/// routing consumes the first chunk so keys and ring points share the
/// same hash family.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Xxh3Partitioner {
    /// Split a 128-bit digest into four little-endian u32 chunks.
    pub fn chunks(digest: u128) -> [u32; 4] {
        let bytes = digest.to_le_bytes();
        let mut out = [0u32; 4];
        for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *slot = u32::from_le_bytes(chunk.try_into().expect("4-byte chunk"));
        }
        out
    }

    /// All four ring positions derived from one per-node replica label.
    pub fn replica_positions(label: &[u8]) -> [u32; 4] {
        Self::chunks(xxh3_128(label))
    }
}

impl Partitioner for Xxh3Partitioner {
    fn position(&self, key: &[u8]) -> u32 {
        Self::chunks(xxh3_128(key))[0]
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
