//! # ds_sim - Distributed System Topology Simulator
//!
//! A teaching tool that walks through four canonical topologies (client-server,
//! peer-to-peer, cluster, cloud) and simulates toy events on them: message
//! exchange, node failure and latency. There is no network underneath; every
//! action is a random draw that updates a per-session set of counters and a
//! rolling event log.
//!
//! ## Core Components
//!
//! - **MetricsState**: counters, latency samples and the bounded event log
//! - **Topology catalog**: static participants and display edges per model
//! - **ActionSimulator**: runs one action, records it, returns an `ActionResult`
//! - **Theory**: static educational panels, independent of the simulation
//!
//! ## Usage
//!
//! ```no_run
//! use ds_sim::{ActionKind, ActionSimulator};
//!
//! let mut sim = ActionSimulator::from_seed([7u8; 32]);
//! let result = sim.simulate("PeerToPeer", ActionKind::Send).unwrap();
//! println!("{}", result.message);
//!
//! // latency actions only report the delay; the caller decides whether to wait
//! let result = sim.simulate("CloudModel", ActionKind::Latency).unwrap();
//! if let Some(delay) = result.delay() {
//!     std::thread::sleep(delay);
//! }
//!
//! for entry in sim.metrics().recent_events(10) {
//!     println!("• {}", entry);
//! }
//! ```

pub mod ds_config;
pub mod ds_interface;
pub mod ds_metrics;
pub mod ds_simulator;
pub mod ds_theory;
pub mod ds_topology;

// Re-export commonly used types
pub use ds_config::SimConfig;
pub use ds_interface::{
    ActionKind, ActionResult, EventClock, FixedClock, LocalClock, Outcome, SimError,
    TopologyKind, EVENT_LOG_CAPACITY, LATENCY_RANGE_SECS, PANEL_LOG_ENTRIES,
};
pub use ds_metrics::{EventLog, MetricsState, MetricsSummary};
pub use ds_simulator::ActionSimulator;
pub use ds_topology::{all_topologies, get_topology, topology, Topology};
