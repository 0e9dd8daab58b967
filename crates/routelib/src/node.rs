//! Node identity and weight descriptors.
//!
//! Nodes represent physical backends participating in the ring. They are
//! identified by host + port; everything else on the descriptor is routing
//! metadata.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weight assigned to a node when none is given explicitly.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Identity of one physical backend.
///
/// Two descriptors with the same host and port are the same node, whatever
/// their name or weight says.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId {
    pub host: String,
    pub port: u16,
}

impl NodeId {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Immutable descriptor of one backend node: identity plus weight.
///
/// Created when a cluster member is registered; removed only by replacing
/// the topology, never mutated in place. Equality and hashing consider the
/// identity only.
///
/// # Example
///
/// ```rust
/// use routelib::NodeDescriptor;
///
/// let node = NodeDescriptor::with_weight("cache-1", 6379, 2.0)
///     .unwrap()
///     .named("cache-1-primary");
/// assert_eq!(node.weight(), 2.0);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "NodeConfig", into = "NodeConfig")]
pub struct NodeDescriptor {
    id: NodeId,
    name: Option<String>,
    weight: f64,
}

impl NodeDescriptor {
    /// Construct a descriptor with the default weight.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::with_weight(host, port, DEFAULT_WEIGHT)
    }

    /// Construct a descriptor with an explicit weight.
    ///
    /// Validates host non-empty, port non-zero, weight finite and positive;
    /// anything else is a configuration error, not a valid node.
    pub fn with_weight(host: impl Into<String>, port: u16, weight: f64) -> Result<Self> {
        let host = host.into();
        if host.is_empty() {
            return Err(Error::InvalidTopology("node host must be non-empty".into()));
        }
        if port == 0 {
            return Err(Error::InvalidTopology(format!(
                "node {host} has port 0; ports must be in 1..=65535"
            )));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::InvalidTopology(format!(
                "node {host}:{port} has weight {weight}; weights must be finite and positive"
            )));
        }
        Ok(Self {
            id: NodeId::new(host, port),
            name: None,
            weight,
        })
    }

    /// Attach a logical name (for logs and operator tooling).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn host(&self) -> &str {
        &self.id.host
    }

    pub fn port(&self) -> u16 {
        self.id.port
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl PartialEq for NodeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NodeDescriptor {}

impl Hash for NodeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Raw serialization shape for a node; validated on the way in so a
/// topology file can never smuggle in a zero port or negative weight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl TryFrom<NodeConfig> for NodeDescriptor {
    type Error = Error;

    fn try_from(raw: NodeConfig) -> Result<Self> {
        let node = NodeDescriptor::with_weight(raw.host, raw.port, raw.weight)?;
        Ok(match raw.name {
            Some(name) => node.named(name),
            None => node,
        })
    }
}

impl From<NodeDescriptor> for NodeConfig {
    fn from(node: NodeDescriptor) -> Self {
        Self {
            host: node.id.host,
            port: node.id.port,
            name: node.name,
            weight: node.weight,
        }
    }
}
