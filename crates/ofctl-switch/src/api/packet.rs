//! Packet-out requests.

use serde::{Deserialize, Serialize};

use super::flow::Action;
use crate::types::BufferId;
use ofctl_types::PortNo;

/// Instructs the switch to emit a packet.
///
/// When `buffer_id` names a buffered packet the switch already holds the
/// frame; otherwise `data` carries it. An empty action list drops the packet
/// and releases the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketOut {
    pub buffer_id: BufferId,
    pub in_port: PortNo,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

impl PacketOut {
    /// Builds a packet-out for a packet received on `in_port`.
    ///
    /// The frame is attached only when the switch did not buffer it.
    pub fn new(buffer_id: BufferId, in_port: PortNo, actions: Vec<Action>, frame: &[u8]) -> Self {
        let data = (!buffer_id.is_buffered()).then(|| frame.to_vec());
        Self {
            buffer_id,
            in_port,
            actions,
            data,
        }
    }

    pub fn is_drop(&self) -> bool {
        self.actions.is_empty()
    }
}
