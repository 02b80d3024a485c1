use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::Local;

/// Maximum number of entries kept in a session's event log (oldest evicted first)
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Number of log entries the metrics panel shows
pub const PANEL_LOG_ENTRIES: usize = 10;

/// Closed range (seconds) the latency action samples from
pub const LATENCY_RANGE_SECS: (f64, f64) = (0.5, 2.5);

// ============================================================================
// Topologies and Actions
// ============================================================================

/// The four fixed system models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    ClientServer,
    PeerToPeer,
    ClusterBased,
    CloudModel,
}

impl TopologyKind {
    pub const ALL: [TopologyKind; 4] = [
        TopologyKind::ClientServer,
        TopologyKind::PeerToPeer,
        TopologyKind::ClusterBased,
        TopologyKind::CloudModel,
    ];

    /// Canonical identifier, as accepted by `get_topology`
    pub fn name(&self) -> &'static str {
        match self {
            TopologyKind::ClientServer => "ClientServer",
            TopologyKind::PeerToPeer => "PeerToPeer",
            TopologyKind::ClusterBased => "ClusterBased",
            TopologyKind::CloudModel => "CloudModel",
        }
    }

    /// Human facing name
    pub fn display_name(&self) -> &'static str {
        match self {
            TopologyKind::ClientServer => "Client-Server",
            TopologyKind::PeerToPeer => "Peer-to-Peer",
            TopologyKind::ClusterBased => "Cluster-Based",
            TopologyKind::CloudModel => "Cloud Model",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TopologyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TopologyKind::ALL
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(wanted)
                    || kind.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| SimError::UnknownTopologyKind(s.to_string()))
    }
}

/// One user-triggered simulated event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Send / distribute / route, depending on the topology
    Send,
    Fail,
    Latency,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Send => "send",
            ActionKind::Fail => "fail",
            ActionKind::Latency => "latency",
        };
        f.write_str(label)
    }
}

impl FromStr for ActionKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "send" | "share" | "distribute" | "route" | "request" => Ok(ActionKind::Send),
            "fail" | "failure" => Ok(ActionKind::Fail),
            "latency" | "delay" => Ok(ActionKind::Latency),
            _ => Err(SimError::UnknownAction(s.to_string())),
        }
    }
}

// ============================================================================
// Action Results
// ============================================================================

/// What an action did, beyond its message
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Message exchanged between participants
    Delivered,
    /// A node was reported down. Nothing is remembered about it afterwards.
    NodeFailed { node: &'static str },
    /// A delay was sampled; the caller decides whether to actually wait it out
    Delayed {
        delay: Duration,
        completion: &'static str,
    },
}

/// Outcome of one simulated action, produced fresh per invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub topology: TopologyKind,
    pub kind: ActionKind,
    /// Participants drawn for this action, in role order (sender first)
    pub participants: Vec<&'static str>,
    /// Display-ready text for the UI
    pub message: String,
    pub outcome: Outcome,
}

impl ActionResult {
    /// Sampled delay, for latency actions
    pub fn delay(&self) -> Option<Duration> {
        match self.outcome {
            Outcome::Delayed { delay, .. } => Some(delay),
            _ => None,
        }
    }

    pub fn failed_node(&self) -> Option<&'static str> {
        match self.outcome {
            Outcome::NodeFailed { node } => Some(node),
            _ => None,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unknown topology kind: {0}")]
    UnknownTopologyKind(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("unknown theory topic: {0}")]
    UnknownTopic(String),

    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read {path}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

// ============================================================================
// Clock
// ============================================================================

/// Source of the timestamp prefixed to every event log entry
pub trait EventClock {
    /// Current time formatted as `HH:MM:SS`
    fn timestamp(&self) -> String;
}

/// Wall clock in the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl EventClock for LocalClock {
    fn timestamp(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

/// Clock frozen at a fixed time, for reproducible logs
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl EventClock for FixedClock {
    fn timestamp(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_kind_parses_canonical_and_display_names() {
        assert_eq!(
            "ClientServer".parse::<TopologyKind>().unwrap(),
            TopologyKind::ClientServer
        );
        assert_eq!(
            "peer-to-peer".parse::<TopologyKind>().unwrap(),
            TopologyKind::PeerToPeer
        );
        assert_eq!(
            "Cloud Model".parse::<TopologyKind>().unwrap(),
            TopologyKind::CloudModel
        );

        let err = "DoesNotExist".parse::<TopologyKind>().unwrap_err();
        assert!(matches!(err, SimError::UnknownTopologyKind(ref name) if name == "DoesNotExist"));
    }

    #[test]
    fn test_action_aliases() {
        assert_eq!("distribute".parse::<ActionKind>().unwrap(), ActionKind::Send);
        assert_eq!("route".parse::<ActionKind>().unwrap(), ActionKind::Send);
        assert_eq!("FAIL".parse::<ActionKind>().unwrap(), ActionKind::Fail);
        assert_eq!("latency".parse::<ActionKind>().unwrap(), ActionKind::Latency);
        assert!("explode".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_local_clock_format() {
        let stamp = LocalClock.timestamp();
        let parts: Vec<&str> = stamp.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit())));
    }
}
