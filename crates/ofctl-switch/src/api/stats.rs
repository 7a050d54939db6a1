//! Per-port counter requests and reply records.

use ofctl_types::PortNo;
use serde::{Deserialize, Serialize};

/// Requests the counters of one port ([`PortNo::ANY`] for every port).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatsRequest {
    pub port_no: PortNo,
}

impl PortStatsRequest {
    pub fn new(port_no: PortNo) -> Self {
        Self { port_no }
    }
}

/// Counters of one port as reported by the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStats {
    pub port_no: PortNo,
    pub rx_packets: u64,
    pub tx_packets: u64,
}
