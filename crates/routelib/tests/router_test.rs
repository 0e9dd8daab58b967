//! Tests for router state: topology swaps, connection registry,
//! concurrent routing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use routelib::{
    ClusterRouter, ClusterTopology, Error, NodeDescriptor, NodeId, RequestService, ServiceError,
};

fn node(host: &str) -> NodeDescriptor {
    NodeDescriptor::new(host, 6379).unwrap()
}

fn id(host: &str) -> NodeId {
    NodeId::new(host, 6379)
}

fn topology(hosts: &[&str]) -> ClusterTopology {
    ClusterTopology::new(hosts.iter().map(|h| node(h)).collect()).unwrap()
}

/// Canned transport handle; the router never calls it, but tests exercise
/// the capability contract end to end the way a caller would.
#[derive(Debug)]
struct FakeTransport {
    reply: Vec<u8>,
}

impl RequestService for FakeTransport {
    fn service_request(&self, command: &str, _args: &[&[u8]]) -> Result<Vec<u8>, ServiceError> {
        if command.is_empty() {
            return Err(ServiceError::Protocol("empty command".into()));
        }
        Ok(self.reply.clone())
    }
}

// ============================================================================
// Connection registry
// ============================================================================

#[test]
fn test_connection_for_unregistered_node_fails() {
    let router: ClusterRouter<FakeTransport> = ClusterRouter::new(&topology(&["n1", "n2"]));

    let err = router.connection_for(&id("n1")).unwrap_err();
    assert!(matches!(err, Error::NodeUnavailable(ref n) if n == &id("n1")));
}

#[test]
fn test_register_then_route_and_service() {
    let router = ClusterRouter::new(&topology(&["n1"]));
    router
        .register_connection(id("n1"), FakeTransport { reply: b"PONG".to_vec() })
        .unwrap();

    let owner = router.route(b"some-key").unwrap();
    let handle = router.connection_for(owner.id()).unwrap();
    let reply = handle.service_request("PING", &[]).unwrap();
    assert_eq!(reply, b"PONG");
}

#[test]
fn test_register_for_unknown_node_fails() {
    let router = ClusterRouter::new(&topology(&["n1"]));

    let err = router
        .register_connection(id("stranger"), FakeTransport { reply: Vec::new() })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTopology(_)));
}

#[test]
fn test_register_replaces_and_returns_previous() {
    let router = ClusterRouter::new(&topology(&["n1"]));

    let first = router
        .register_connection(id("n1"), FakeTransport { reply: b"old".to_vec() })
        .unwrap();
    assert!(first.is_none());

    let previous = router
        .register_connection(id("n1"), FakeTransport { reply: b"new".to_vec() })
        .unwrap()
        .expect("previous handle returned");
    assert_eq!(previous.service_request("PING", &[]).unwrap(), b"old");

    let current = router.connection_for(&id("n1")).unwrap();
    assert_eq!(current.service_request("PING", &[]).unwrap(), b"new");
}

#[test]
fn test_deregister_connection() {
    let router = ClusterRouter::new(&topology(&["n1"]));
    router
        .register_connection(id("n1"), FakeTransport { reply: Vec::new() })
        .unwrap();

    assert!(router.deregister_connection(&id("n1")).is_some());
    assert!(router.deregister_connection(&id("n1")).is_none());
    assert!(matches!(
        router.connection_for(&id("n1")),
        Err(Error::NodeUnavailable(_))
    ));
}

#[test]
fn test_unconnected_nodes_tracks_registry() {
    let router = ClusterRouter::new(&topology(&["n1", "n2"]));
    assert_eq!(router.unconnected_nodes().len(), 2);

    router
        .register_connection(id("n1"), FakeTransport { reply: Vec::new() })
        .unwrap();
    let unconnected = router.unconnected_nodes();
    assert_eq!(unconnected.len(), 1);
    assert_eq!(unconnected[0].id(), &id("n2"));
}

#[test]
fn test_protocol_error_surfaces() {
    let transport = FakeTransport { reply: Vec::new() };
    let err = transport.service_request("", &[]).unwrap_err();
    assert!(matches!(err, ServiceError::Protocol(_)));
}

// ============================================================================
// Topology updates
// ============================================================================

#[test]
fn test_update_reports_diff() {
    let router: ClusterRouter<()> = ClusterRouter::new(&topology(&["n1", "n2"]));

    let diff = router.update_topology(&topology(&["n1", "n3"]));
    assert_eq!(diff.added, vec![node("n3")]);
    assert_eq!(diff.removed, vec![node("n2")]);

    // Connection lifecycle stays with the caller: the removed node's
    // handle (none registered here) is untouched, and the ring reflects
    // the new node set immediately.
    assert!(router.ring().contains(&id("n3")));
    assert!(!router.ring().contains(&id("n2")));
}

#[test]
fn test_registered_handles_survive_update() {
    let router = ClusterRouter::new(&topology(&["n1", "n2"]));
    router
        .register_connection(id("n1"), FakeTransport { reply: Vec::new() })
        .unwrap();

    router.update_topology(&topology(&["n1", "n3"]));

    // The router does not close handles on topology change.
    assert!(router.connection_for(&id("n1")).is_ok());
}

#[test]
fn test_snapshot_isolated_from_update() {
    let router: ClusterRouter<()> = ClusterRouter::new(&topology(&["n1", "n2"]));
    let snapshot = router.ring();

    router.update_topology(&topology(&["n1"]));

    // The held snapshot still sees the old topology; new routes see the
    // new one.
    assert!(snapshot.contains(&id("n2")));
    assert!(!router.ring().contains(&id("n2")));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_routes_during_updates() {
    let router: ClusterRouter<()> = ClusterRouter::new(&topology(&["n1", "n2"]));
    let valid: HashSet<NodeId> = ["n1", "n2", "n3"].iter().map(|h| id(h)).collect();
    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let router = &router;
            let valid = &valid;
            let done = &done;
            scope.spawn(move || {
                let mut i = 0u64;
                while !done.load(Ordering::Relaxed) {
                    let key = format!("worker-{worker}-key-{i}");
                    let owner = router.route(key.as_bytes()).unwrap();
                    assert!(
                        valid.contains(owner.id()),
                        "routed to a node outside every installed topology"
                    );
                    i += 1;
                }
            });
        }

        // Administrative path: swap topologies back and forth while the
        // workers route.
        for _ in 0..50 {
            router.update_topology(&topology(&["n1", "n2", "n3"]));
            router.update_topology(&topology(&["n1", "n2"]));
        }
        done.store(true, Ordering::Relaxed);
    });
}
