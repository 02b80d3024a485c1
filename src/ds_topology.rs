//! Static catalog of the four system models
//!
//! Each entry names its participants, the edges used to draw it and the sets
//! the simulator draws from. Edges are display data only; the random draws never
//! look at them.

use crate::ds_interface::{SimError, TopologyKind};

/// One fixed topology definition
#[derive(Debug, PartialEq)]
pub struct Topology {
    pub kind: TopologyKind,
    pub description: &'static str,
    pub nodes: &'static [&'static str],
    pub edges: &'static [(&'static str, &'static str)],
    /// Whether `edges` are directed (false for the peer mesh)
    pub directed: bool,
    /// Candidates for the first participant of a send
    pub senders: &'static [&'static str],
    /// Candidates for the second participant of a send
    pub receivers: &'static [&'static str],
    /// Candidates for the fail action
    pub fail_candidates: &'static [&'static str],
}

impl Topology {
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(&node)
    }

    /// Neighbours reachable from `node` along the display edges
    pub fn neighbours(&self, node: &str) -> Vec<&'static str> {
        self.edges
            .iter()
            .filter_map(|&(from, to)| {
                if from == node {
                    Some(to)
                } else if !self.directed && to == node {
                    Some(from)
                } else {
                    None
                }
            })
            .collect()
    }
}

const PEERS: &[&str] = &["Peer A", "Peer B", "Peer C", "Peer D"];
const CLIENTS: &[&str] = &["Client 1", "Client 2", "Client 3"];
const WORKERS: &[&str] = &["Worker 1", "Worker 2", "Worker 3", "Worker 4"];
const USERS: &[&str] = &["User 1", "User 2"];
const DATA_CENTERS: &[&str] = &["Data Center 1", "Data Center 2"];

static CLIENT_SERVER: Topology = Topology {
    kind: TopologyKind::ClientServer,
    description: "Clients send requests to a central server for processing.",
    nodes: &["Server", "Client 1", "Client 2", "Client 3"],
    edges: &[
        ("Client 1", "Server"),
        ("Client 2", "Server"),
        ("Client 3", "Server"),
        ("Server", "Client 1"),
        ("Server", "Client 2"),
        ("Server", "Client 3"),
    ],
    directed: true,
    senders: &["Client 1"],
    receivers: &["Server"],
    fail_candidates: CLIENTS,
};

static PEER_TO_PEER: Topology = Topology {
    kind: TopologyKind::PeerToPeer,
    description: "Every node acts as both client and server, sharing resources directly.",
    nodes: PEERS,
    edges: &[
        ("Peer A", "Peer B"),
        ("Peer A", "Peer C"),
        ("Peer B", "Peer D"),
        ("Peer C", "Peer D"),
    ],
    directed: false,
    senders: PEERS,
    receivers: PEERS,
    fail_candidates: PEERS,
};

static CLUSTER_BASED: Topology = Topology {
    kind: TopologyKind::ClusterBased,
    description: "A master node distributes tasks to multiple workers for parallel processing.",
    nodes: &["Master Node", "Worker 1", "Worker 2", "Worker 3", "Worker 4"],
    edges: &[
        ("Master Node", "Worker 1"),
        ("Master Node", "Worker 2"),
        ("Master Node", "Worker 3"),
        ("Master Node", "Worker 4"),
    ],
    directed: true,
    senders: &["Master Node"],
    receivers: WORKERS,
    fail_candidates: WORKERS,
};

static CLOUD_MODEL: Topology = Topology {
    kind: TopologyKind::CloudModel,
    description: "Resources are delivered as services over the internet from data centers.",
    nodes: &[
        "User 1",
        "User 2",
        "Cloud Provider",
        "Data Center 1",
        "Data Center 2",
    ],
    edges: &[
        ("User 1", "Cloud Provider"),
        ("User 2", "Cloud Provider"),
        ("Cloud Provider", "Data Center 1"),
        ("Cloud Provider", "Data Center 2"),
        ("Data Center 1", "Cloud Provider"),
        ("Data Center 2", "Cloud Provider"),
        ("Cloud Provider", "User 1"),
        ("Cloud Provider", "User 2"),
    ],
    directed: true,
    senders: USERS,
    receivers: DATA_CENTERS,
    fail_candidates: &["User 1", "User 2", "Data Center 1", "Data Center 2"],
};

/// Catalog entry for a known kind
pub fn topology(kind: TopologyKind) -> &'static Topology {
    match kind {
        TopologyKind::ClientServer => &CLIENT_SERVER,
        TopologyKind::PeerToPeer => &PEER_TO_PEER,
        TopologyKind::ClusterBased => &CLUSTER_BASED,
        TopologyKind::CloudModel => &CLOUD_MODEL,
    }
}

/// Look a topology up by name (`ClientServer`, `PeerToPeer`, `ClusterBased`, `CloudModel`,
/// or their display names)
pub fn get_topology(name: &str) -> Result<&'static Topology, SimError> {
    name.parse::<TopologyKind>().map(topology)
}

/// Every topology, in menu order
pub fn all_topologies() -> impl Iterator<Item = &'static Topology> {
    TopologyKind::ALL.into_iter().map(topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_client_server_nodes() {
        let topo = get_topology("ClientServer").unwrap();
        let nodes: HashSet<&str> = topo.nodes.iter().copied().collect();
        let expected: HashSet<&str> = ["Server", "Client 1", "Client 2", "Client 3"]
            .into_iter()
            .collect();
        assert_eq!(nodes, expected);
        assert_eq!(topo.nodes.len(), 4);
    }

    #[test]
    fn test_unknown_topology() {
        let err = get_topology("DoesNotExist").unwrap_err();
        assert!(matches!(err, SimError::UnknownTopologyKind(_)));
    }

    #[test]
    fn test_lookup_returns_same_static_entry() {
        for kind in TopologyKind::ALL {
            let by_name = get_topology(kind.name()).unwrap();
            assert!(std::ptr::eq(by_name, topology(kind)));
            assert_eq!(by_name.kind, kind);
        }
    }

    #[test]
    fn test_edges_and_draw_sets_reference_known_nodes() {
        for topo in all_topologies() {
            for (from, to) in topo.edges {
                assert!(topo.contains(from), "{} missing {}", topo.kind, from);
                assert!(topo.contains(to), "{} missing {}", topo.kind, to);
            }
            for node in topo
                .senders
                .iter()
                .chain(topo.receivers)
                .chain(topo.fail_candidates)
            {
                assert!(topo.contains(node), "{} missing {}", topo.kind, node);
            }
        }
    }

    #[test]
    fn test_master_never_fails() {
        let cluster = topology(TopologyKind::ClusterBased);
        assert!(!cluster.fail_candidates.contains(&"Master Node"));
        assert_eq!(cluster.fail_candidates.len(), 4);
    }

    #[test]
    fn test_neighbours_cover_every_edge() {
        for topo in all_topologies() {
            let listed: usize = topo.nodes.iter().map(|n| topo.neighbours(n).len()).sum();
            let expected = if topo.directed {
                topo.edges.len()
            } else {
                topo.edges.len() * 2
            };
            assert_eq!(listed, expected, "{}", topo.kind);
        }
    }

    #[test]
    fn test_neighbours_respect_direction() {
        let p2p = topology(TopologyKind::PeerToPeer);
        let mut around_d = p2p.neighbours("Peer D");
        around_d.sort();
        assert_eq!(around_d, vec!["Peer B", "Peer C"]);

        let cluster = topology(TopologyKind::ClusterBased);
        assert!(cluster.neighbours("Worker 1").is_empty());
        assert_eq!(cluster.neighbours("Master Node").len(), 4);
    }
}
