//! Transport capability contract.
//!
//! The routing engine never opens sockets or encodes commands. Callers
//! connect, authenticate, and select databases on their own, then register
//! the resulting handle with the router; the router only hands handles
//! back by node identity.

use std::io;

/// Errors a transport handle can surface from one request.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The backend answered, but with a protocol-level error.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The channel itself failed (connect, read, write).
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

/// Blocking request capability against one backend node.
///
/// Implementations are expected to be fully initialized (connected,
/// authenticated, database selected) before registration. Retry and
/// backoff for a failed node's traffic belong to the implementation or
/// its caller, never to the routing engine.
pub trait RequestService: Send + Sync {
    /// Issue one command with its arguments and return the raw response.
    fn service_request(&self, command: &str, args: &[&[u8]]) -> Result<Vec<u8>, ServiceError>;
}
