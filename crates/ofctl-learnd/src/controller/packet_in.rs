//! Packet-in handling: learn, classify, install a rule, release the packet.

use super::Controller;
use crate::error::Result;
use crate::frame::EthernetAddresses;
use ofctl_switch::api::{Action, PacketOut};
use ofctl_switch::{PacketIn, SwitchConnection};
use ofctl_types::PortNo;
use tracing::{info, warn};

/// What the controller did with one packet-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketVerdict {
    /// Too short to read; dropped without learning.
    Malformed,
    /// Belongs to the blocked host pair; block rules installed and dropped.
    Blocked,
    /// Destination unknown; flooded.
    Flooded,
    /// Destination learned; forwarding rule installed.
    Forwarded { port: PortNo },
}

impl Controller {
    /// Handles one packet-in. Exactly one packet-out is sent for it.
    pub async fn handle_packet_in(
        &mut self,
        switch: &dyn SwitchConnection,
        packet: &PacketIn,
    ) -> Result<PacketVerdict> {
        let dpid = switch.datapath_id();
        let in_port = packet.in_port;

        let eth = match EthernetAddresses::parse(&packet.data) {
            Ok(eth) => eth,
            Err(e) => {
                warn!(dpid = %dpid, in_port = %in_port, error = %e, "dropping malformed frame");
                release(switch, packet, Vec::new()).await?;
                return Ok(PacketVerdict::Malformed);
            }
        };

        info!(
            dpid = %dpid,
            src = %eth.src,
            dst = %eth.dst,
            ether_type = eth.ether_type,
            in_port = %in_port,
            "packet in"
        );

        self.hosts.observe(eth.src, in_port);
        self.mac_table.learn(dpid, eth.src, in_port);
        let out_port = self.mac_table.resolve(dpid, &eth.dst);

        if let Some(host1_port) = self.hosts.host1_port() {
            self.poller.start(switch, host1_port).await?;
        }

        if self.classifier.is_blocked_flow(&packet.data) {
            let (a, b) = self.hosts.blocked_pair();
            info!(dpid = %dpid, a = %a, b = %b, "blocking traffic between hosts");
            self.rules.install_block(switch, a, b).await?;
            release(switch, packet, Vec::new()).await?;
            return Ok(PacketVerdict::Blocked);
        }

        let actions = vec![Action::output(out_port)];
        let verdict = if out_port == PortNo::FLOOD {
            PacketVerdict::Flooded
        } else {
            self.rules
                .install_forward(switch, in_port, eth.dst, actions.clone())
                .await?;
            PacketVerdict::Forwarded { port: out_port }
        };

        release(switch, packet, actions).await?;
        Ok(verdict)
    }
}

/// Sends the packet-out for `packet`. Empty actions drop it.
async fn release(
    switch: &dyn SwitchConnection,
    packet: &PacketIn,
    actions: Vec<Action>,
) -> Result<()> {
    let out = PacketOut::new(packet.buffer_id, packet.in_port, actions, &packet.data);
    switch.send(out.into()).await?;
    Ok(())
}
