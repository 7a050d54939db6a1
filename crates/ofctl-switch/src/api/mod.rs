//! Outbound switch requests.
//!
//! - [`flow`]: rule-add requests (match, actions, priority, timeouts)
//! - [`packet`]: packet-out requests
//! - [`stats`]: per-port counter requests and reply records

pub mod flow;
pub mod packet;
pub mod stats;

pub use flow::{Action, FlowMod, FlowModFlags, Match, DEFAULT_PRIORITY, ETH_TYPE_IPV4};
pub use packet::PacketOut;
pub use stats::{PortStats, PortStatsRequest};
