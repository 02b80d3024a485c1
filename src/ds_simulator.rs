//! Action simulator
//!
//! Runs send, fail and latency actions against one of the catalog topologies.
//! Each call draws its participants uniformly from the topology's eligible sets,
//! updates the session's `MetricsState` and returns a display-ready `ActionResult`.
//!
//! Failures are stateless: a node reported down stays eligible for every later
//! draw. Latency actions only *report* a delay; waiting it out is the caller's job.

use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::ds_config::SimConfig;
use crate::ds_interface::{
    ActionKind, ActionResult, EventClock, Outcome, SimError, TopologyKind,
    LATENCY_RANGE_SECS,
};
use crate::ds_metrics::MetricsState;
use crate::ds_topology::{get_topology, topology, Topology};

/// Simulation handler owning one session's state and random source
pub struct ActionSimulator<R: Rng = StdRng> {
    rng: R,
    metrics: MetricsState,
    latency_range: (f64, f64),
    seed: Option<[u8; 32]>,
}

impl ActionSimulator<StdRng> {
    /// Session configured from `config`, seeded from its seed or from entropy
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let seed = config.resolve_seed()?;
        let mut simulator = Self::from_seed(seed);
        simulator.latency_range = config.latency_range();
        info!(
            "new session: latency {:.2}..={:.2}s, seed {}",
            simulator.latency_range.0,
            simulator.latency_range.1,
            crate::ds_config::format_seed(&seed)
        );
        Ok(simulator)
    }

    /// Reproducible session: same seed and same actions give the same results
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let mut simulator = Self::with_rng(StdRng::from_seed(seed), MetricsState::new());
        simulator.seed = Some(seed);
        simulator
    }
}

impl<R: Rng> ActionSimulator<R> {
    pub fn with_rng(rng: R, metrics: MetricsState) -> Self {
        Self {
            rng,
            metrics,
            latency_range: LATENCY_RANGE_SECS,
            seed: None,
        }
    }

    /// Injected random source with log entries stamped by `clock`
    pub fn with_clock(rng: R, clock: Box<dyn EventClock>) -> Self {
        Self::with_rng(rng, MetricsState::with_clock(clock))
    }

    /// Seed the random source was built from, when known
    pub fn seed(&self) -> Option<[u8; 32]> {
        self.seed
    }

    pub fn metrics(&self) -> &MetricsState {
        &self.metrics
    }

    pub fn latency_range(&self) -> (f64, f64) {
        self.latency_range
    }

    /// Clear counters and log; the random source keeps its position
    pub fn reset(&mut self) {
        info!("session reset");
        self.metrics.reset();
    }

    /// Run `action` against the topology named `topology_name`
    pub fn simulate(
        &mut self,
        topology_name: &str,
        action: ActionKind,
    ) -> Result<ActionResult, SimError> {
        let topo = get_topology(topology_name)?;
        Ok(self.run(topo, action))
    }

    /// Run `action` against an already resolved topology; cannot fail
    pub fn simulate_kind(&mut self, kind: TopologyKind, action: ActionKind) -> ActionResult {
        self.run(topology(kind), action)
    }

    fn run(&mut self, topo: &'static Topology, action: ActionKind) -> ActionResult {
        let result = match action {
            ActionKind::Send => self.send(topo),
            ActionKind::Fail => self.fail(topo),
            ActionKind::Latency => self.latency(topo),
        };
        debug!(
            "{} {}: {:?} -> {}",
            topo.kind, action, result.participants, result.message
        );
        result
    }

    fn pick(&mut self, candidates: &'static [&'static str]) -> &'static str {
        debug_assert!(!candidates.is_empty(), "empty candidate set");
        candidates.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn send(&mut self, topo: &'static Topology) -> ActionResult {
        let (participants, message) = match topo.kind {
            TopologyKind::ClientServer => {
                let client = topo.senders[0];
                let server = topo.receivers[0];
                self.metrics.record_message();
                self.metrics
                    .log_event(&format!("{} → {}: Request Sent", client, server));
                self.metrics
                    .log_event(&format!("{} → {}: Response Sent", server, client));
                (
                    vec![client, server],
                    "Message exchanged successfully!".to_string(),
                )
            }
            TopologyKind::PeerToPeer => {
                let sender = self.pick(topo.senders);
                let others: Vec<&'static str> = topo
                    .receivers
                    .iter()
                    .copied()
                    .filter(|peer| *peer != sender)
                    .collect();
                let receiver = others.choose(&mut self.rng).copied().unwrap_or_default();
                self.metrics.record_message();
                self.metrics
                    .log_event(&format!("{} → {}: File Sent Successfully", sender, receiver));
                (
                    vec![sender, receiver],
                    format!("{} → {}: 'File Sent Successfully'", sender, receiver),
                )
            }
            TopologyKind::ClusterBased => {
                let master = topo.senders[0];
                let worker = self.pick(topo.receivers);
                self.metrics.record_message();
                self.metrics
                    .log_event(&format!("Master → {}: Task Assigned", worker));
                (
                    vec![master, worker],
                    format!("{} → {}: 'Task Assigned ✅'", master, worker),
                )
            }
            TopologyKind::CloudModel => {
                let user = self.pick(topo.senders);
                let datacenter = self.pick(topo.receivers);
                self.metrics.record_message();
                self.metrics.log_event(&format!(
                    "{} → Cloud Provider → {}: Request Delivered",
                    user, datacenter
                ));
                (
                    vec![user, datacenter],
                    format!(
                        "{}'s service request successfully routed to {}",
                        user, datacenter
                    ),
                )
            }
        };

        ActionResult {
            topology: topo.kind,
            kind: ActionKind::Send,
            participants,
            message,
            outcome: Outcome::Delivered,
        }
    }

    fn fail(&mut self, topo: &'static Topology) -> ActionResult {
        let node = self.pick(topo.fail_candidates);
        self.metrics.record_failure();
        self.metrics.log_event(&format!("{} has failed!", node));

        let message = match topo.kind {
            TopologyKind::CloudModel => format!("{} is down!", node),
            _ => format!("{} is down! ❌", node),
        };

        ActionResult {
            topology: topo.kind,
            kind: ActionKind::Fail,
            participants: vec![node],
            message,
            outcome: Outcome::NodeFailed { node },
        }
    }

    fn latency(&mut self, topo: &'static Topology) -> ActionResult {
        let (low, high) = self.latency_range;
        let seconds = self.rng.gen_range(low..=high);
        self.metrics.record_latency(seconds);

        let entry = match topo.kind {
            TopologyKind::CloudModel => format!("Latency: {:.2} seconds", seconds),
            _ => format!("Simulating latency of {:.2} seconds...", seconds),
        };
        self.metrics.log_event(&entry);

        let completion = match topo.kind {
            TopologyKind::ClientServer => "Message delivered!",
            TopologyKind::PeerToPeer => "File successfully shared!",
            TopologyKind::ClusterBased => "Task successfully distributed!",
            TopologyKind::CloudModel => "Data successfully transmitted!",
        };

        ActionResult {
            topology: topo.kind,
            kind: ActionKind::Latency,
            participants: Vec::new(),
            message: format!("Waiting {:.2} seconds...", seconds),
            outcome: Outcome::Delayed {
                delay: Duration::from_secs_f64(seconds),
                completion,
            },
        }
    }
}
