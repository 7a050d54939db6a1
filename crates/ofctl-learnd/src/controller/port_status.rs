//! Port lifecycle handling and the host1 traffic report.

use super::Controller;
use crate::stats_poller::StatsSnapshot;
use ofctl_switch::{PortReason, PortStatus, SwitchConnection};
use tracing::{error, info};

impl Controller {
    /// Logs a port change.
    ///
    /// When host1's port is deleted, returns a copy of the latest counters
    /// snapshot after logging it. No state is changed.
    pub fn handle_port_status(
        &self,
        switch: &dyn SwitchConnection,
        status: &PortStatus,
    ) -> Option<StatsSnapshot> {
        let dpid = switch.datapath_id();
        let port = status.port_no;

        match status.reason() {
            Some(PortReason::Add) => {
                info!(dpid = %dpid, port = %port, "port added");
                None
            }
            Some(PortReason::Modify) => {
                info!(dpid = %dpid, port = %port, "port modified");
                None
            }
            Some(PortReason::Delete) => {
                info!(dpid = %dpid, port = %port, "port deleted");
                if self.hosts.host1_port() != Some(port) {
                    return None;
                }

                let snapshot = self.poller.snapshot().clone();
                let captured_at = snapshot
                    .captured_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string());
                info!(
                    dpid = %dpid,
                    port = %port,
                    captured_at = %captured_at,
                    records = %snapshot.summary(),
                    "host1 port removed, final traffic"
                );
                Some(snapshot)
            }
            None => {
                error!(
                    dpid = %dpid,
                    port = %port,
                    reason = status.reason,
                    "illegal port state"
                );
                None
            }
        }
    }
}
