//! Error types for the routing engine.

use crate::node::NodeId;

/// Result type alias for the routing engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building rings or routing keys.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Node set rejected at construction time: empty, duplicate identity,
    /// or an invalid host/port/weight.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
    /// No transport handle is registered for the resolved node.
    #[error("node unavailable: no connection registered for {0}")]
    NodeUnavailable(NodeId),
    /// Ring invariant violation. Unrecoverable internal fault; surfaced,
    /// never retried or masked.
    #[error("ring integrity: {0}")]
    RingIntegrity(String),
}
