//! Inbound switch notifications.

use ofctl_types::PortNo;
use serde::{Deserialize, Serialize};

use crate::api::{Match, PortStats};
use crate::types::{BufferId, FlowRemovedReason, PortReason};

/// A frame the switch could not match and handed to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketIn {
    pub in_port: PortNo,
    pub buffer_id: BufferId,
    /// Raw Ethernet frame bytes.
    pub data: Vec<u8>,
}

/// A port was added, removed or changed.
///
/// The reason is kept as its raw code so that unknown codes reach the
/// controller instead of failing decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatus {
    pub reason: u8,
    pub port_no: PortNo,
}

impl PortStatus {
    pub fn new(reason: PortReason, port_no: PortNo) -> Self {
        let reason = match reason {
            PortReason::Add => 0,
            PortReason::Delete => 1,
            PortReason::Modify => 2,
        };
        Self { reason, port_no }
    }

    pub fn reason(&self) -> Option<PortReason> {
        PortReason::from_raw(self.reason)
    }
}

/// Reply to a port counters request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatsReply {
    pub stats: Vec<PortStats>,
}

/// Handshake information sent by a switch when it connects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchFeatures {
    pub n_buffers: u32,
    pub n_tables: u8,
}

/// A rule installed with the notify-on-removal flag left the switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRemoved {
    #[serde(rename = "match")]
    pub match_fields: Match,
    pub priority: u16,
    pub reason: u8,
    pub duration_sec: u32,
    pub packet_count: u64,
}

impl FlowRemoved {
    pub fn reason(&self) -> FlowRemovedReason {
        FlowRemovedReason::from(self.reason)
    }
}

/// Every notification kind the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchEvent {
    Features(SwitchFeatures),
    PacketIn(PacketIn),
    PortStatus(PortStatus),
    PortStatsReply(PortStatsReply),
    FlowRemoved(FlowRemoved),
    Disconnected,
}

impl SwitchEvent {
    /// Short notification name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SwitchEvent::Features(_) => "features",
            SwitchEvent::PacketIn(_) => "packet_in",
            SwitchEvent::PortStatus(_) => "port_status",
            SwitchEvent::PortStatsReply(_) => "port_stats_reply",
            SwitchEvent::FlowRemoved(_) => "flow_removed",
            SwitchEvent::Disconnected => "disconnected",
        }
    }
}
