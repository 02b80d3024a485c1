//! Educational text panels
//!
//! Fixed topic -> markdown table, built on first use. Has no interaction with the
//! simulation core.

use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::ds_interface::SimError;

const TOPICS: &[(&str, &str)] = &[
    (
        "Network Packet Drop",
        "Packet drops occur when data packets traveling across a network fail to reach their destination.
Reasons include network congestion, faulty routing, or physical layer issues.
In distributed systems, this can affect consistency and reliability.",
    ),
    (
        "Load Balancing",
        "Load balancing is the process of distributing tasks evenly across multiple nodes.
This prevents any single node from becoming a bottleneck and improves performance.
Common algorithms include Round Robin, Least Connections, and Resource-Based.",
    ),
    (
        "Fault Tolerance",
        "Fault tolerance ensures that a system continues to operate even if some components fail.
Techniques include replication, failover mechanisms, and distributed consensus protocols.",
    ),
    (
        "Replication and Consistency",
        "Data replication involves maintaining multiple copies of data across different nodes.
Consistency ensures all replicas reflect the same data state. Models include eventual consistency,
strong consistency, and causal consistency.",
    ),
    (
        "Scalability",
        "Scalability refers to the system's ability to handle growth (in users, data, etc.).
Horizontal scaling adds more nodes, while vertical scaling upgrades existing ones.",
    ),
    (
        "Testing in Distributed Systems",
        "Testing distributed systems involves validating functionality, performance,
fault recovery, and consistency under different network conditions and failures.
Simulations and chaos testing tools are often used.",
    ),
    (
        "Transparency in Distributed Systems",
        "Distributed systems aim to provide transparency to users in several ways:

- **Access Transparency**: Hide differences in data representation and how resources are accessed.
- **Location Transparency**: Hide the physical location of resources.
- **Concurrency Transparency**: Allow concurrent access to shared resources without interference.
- **Replication Transparency**: Hide replication of resources to improve reliability and performance.
- **Failure Transparency**: Hide failure and recovery of resources.",
    ),
    (
        "Types of Latency",
        "- **Propagation Delay**: Time taken for a signal to travel from sender to receiver.
- **Transmission Delay**: Time to push all bits into the wire.
- **Processing Delay**: Time taken by nodes to process the packet header.",
    ),
    (
        "CAP Theorem",
        "The **CAP Theorem** states that a distributed system can only satisfy **two out of three** guarantees:

- **Consistency**: All nodes see the same data at the same time.
- **Availability**: Every request receives a (non-error) response.
- **Partition Tolerance**: The system continues to operate despite network partitioning.

> In practice, distributed systems choose **CA**, **CP**, or **AP** based on their needs.",
    ),
    (
        "Types of Failures in Distributed Systems",
        "- **Crash Failure**: Node stops working and becomes unresponsive.
- **Omission Failure**: Message is lost during transmission.
- **Timing Failure**: Node responds, but outside the expected time window.
- **Byzantine Failure**: Node behaves arbitrarily or maliciously (hardest to detect).",
    ),
    (
        "Middleware in Distributed Systems",
        "Middleware is a software layer that lies between the operating system and distributed applications. It:

- Provides communication, data exchange, and service management.
- Hides system complexity.
- Ensures interoperability between different systems.",
    ),
    (
        "Comparison of System Models",
        "| Model         | Central Control | Scalability | Fault Tolerance | Example    |
|---------------|-----------------|-------------|-----------------|------------|
| Client-Server | Yes             | Limited     | Low             | Web Apps   |
| Peer-to-Peer  | No              | High        | High            | BitTorrent |
| Cluster-Based | Yes             | Good        | Moderate        | Hadoop     |
| Cloud Model   | Yes             | Excellent   | High            | AWS, Azure |",
    ),
];

fn table() -> &'static IndexMap<&'static str, &'static str> {
    static TABLE: OnceLock<IndexMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| TOPICS.iter().copied().collect())
}

/// Topic names in presentation order
pub fn topics() -> impl Iterator<Item = &'static str> {
    table().keys().copied()
}

/// Body of `name`, matched ignoring case. A unique prefix is enough.
pub fn lookup(name: &str) -> Result<(&'static str, &'static str), SimError> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return Err(SimError::UnknownTopic(name.to_string()));
    }

    if let Some((title, body)) = table()
        .iter()
        .find(|(title, _)| title.to_lowercase() == wanted)
    {
        return Ok((*title, *body));
    }

    let mut prefixed = table()
        .iter()
        .filter(|(title, _)| title.to_lowercase().starts_with(&wanted));
    match (prefixed.next(), prefixed.next()) {
        (Some((title, body)), None) => Ok((*title, *body)),
        _ => Err(SimError::UnknownTopic(name.to_string())),
    }
}
