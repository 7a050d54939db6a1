//! Learning switch controller.
//!
//! Reacts to switch notifications, learns which port each MAC address lives
//! behind, installs forwarding rules so later traffic bypasses the
//! controller, blocks IPv4 traffic between two configured hosts and polls
//! the traffic counters of a third host's port.
//!
//! # Architecture
//!
//! ```text
//! [switch] ──> [Controller::dispatch] ──> packet-in ──> [HostRegistry]
//!                     │                       │         [MacLearningTable]
//!                     │                       │         [TrafficClassifier]
//!                     │                       └──> [FlowRuleSynthesizer] ──> [switch]
//!                     ├──> port-status ──> host1 traffic report
//!                     └──> stats-reply ──> [StatsPoller] ──(timer)──> [switch]
//! ```
//!
//! # Key Components
//!
//! - [`controller::Controller`]: owns all state and dispatches events
//! - [`stats_poller::StatsPoller`]: counter polling on a detached timer
//! - [`replay`]: JSON-lines transport used by the `learnd` binary

pub mod classifier;
pub mod config;
pub mod controller;
pub mod error;
pub mod flow_rules;
pub mod frame;
pub mod host_registry;
pub mod mac_table;
pub mod replay;
pub mod stats_poller;

pub use config::ControllerConfig;
pub use controller::{Controller, PacketVerdict};
pub use error::{ControllerError, Result};
pub use stats_poller::{PollState, StatsSnapshot};
