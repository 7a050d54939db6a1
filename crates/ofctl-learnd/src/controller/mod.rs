//! The controller context and its event dispatcher.
//!
//! A single [`Controller`] owns all learned state: the host registry, the MAC
//! learning table and the stats poller. Events are applied one at a time
//! through `&mut self`, in delivery order; no locking is involved.

mod packet_in;
mod port_status;

pub use packet_in::PacketVerdict;

use crate::classifier::TrafficClassifier;
use crate::config::ControllerConfig;
use crate::error::Result;
use crate::flow_rules::FlowRuleSynthesizer;
use crate::host_registry::HostRegistry;
use crate::mac_table::MacLearningTable;
use crate::stats_poller::StatsPoller;
use ofctl_switch::{FlowRemoved, SwitchConnection, SwitchEvent, SwitchFeatures};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Learning switch controller with host blocking and counter polling.
#[derive(Debug)]
pub struct Controller {
    hosts: HostRegistry,
    mac_table: MacLearningTable,
    classifier: TrafficClassifier,
    rules: FlowRuleSynthesizer,
    poller: StatsPoller,
}

impl Controller {
    pub fn new(config: &ControllerConfig) -> Self {
        let hosts = HostRegistry::new(&config.hosts);
        let (a, b) = hosts.blocked_pair();
        Self {
            hosts,
            mac_table: MacLearningTable::new(),
            classifier: TrafficClassifier::new(a, b),
            rules: FlowRuleSynthesizer::new(&config.timers),
            poller: StatsPoller::new(config.poll_interval()),
        }
    }

    pub fn hosts(&self) -> &HostRegistry {
        &self.hosts
    }

    pub fn mac_table(&self) -> &MacLearningTable {
        &self.mac_table
    }

    pub fn poller(&self) -> &StatsPoller {
        &self.poller
    }

    /// Routes one switch notification to its handler.
    #[instrument(skip_all, fields(dpid = %switch.datapath_id(), event = event.kind()))]
    pub async fn dispatch(
        &mut self,
        switch: Arc<dyn SwitchConnection>,
        event: SwitchEvent,
    ) -> Result<()> {
        match event {
            SwitchEvent::Features(features) => {
                self.handle_features(switch.as_ref(), &features).await
            }
            SwitchEvent::PacketIn(packet) => {
                self.handle_packet_in(switch.as_ref(), &packet).await?;
                Ok(())
            }
            SwitchEvent::PortStatus(status) => {
                self.handle_port_status(switch.as_ref(), &status);
                Ok(())
            }
            SwitchEvent::PortStatsReply(reply) => {
                self.poller.on_reply(switch, &reply);
                Ok(())
            }
            SwitchEvent::FlowRemoved(removed) => {
                self.handle_flow_removed(switch.as_ref(), &removed);
                Ok(())
            }
            SwitchEvent::Disconnected => {
                let dpid = switch.datapath_id();
                info!(
                    dpid = %dpid,
                    learned = self.mac_table.len(dpid),
                    "switch disconnected"
                );
                Ok(())
            }
        }
    }

    /// Installs the table-miss rule on a newly connected switch.
    pub async fn handle_features(
        &self,
        switch: &dyn SwitchConnection,
        features: &SwitchFeatures,
    ) -> Result<()> {
        info!(
            dpid = %switch.datapath_id(),
            n_buffers = features.n_buffers,
            n_tables = features.n_tables,
            "switch connected"
        );
        self.rules.install_table_miss(switch).await
    }

    fn handle_flow_removed(&self, switch: &dyn SwitchConnection, removed: &FlowRemoved) {
        debug!(
            dpid = %switch.datapath_id(),
            rule = %removed.match_fields,
            priority = removed.priority,
            reason = %removed.reason(),
            duration_sec = removed.duration_sec,
            packets = removed.packet_count,
            "flow removed"
        );
    }

    /// Cancels the pending poll timer, if any.
    pub async fn shutdown(&self) {
        self.poller.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats_poller::PollState;
    use ofctl_switch::api::{Action, PortStats};
    use ofctl_switch::{FlowRemovedReason, PortStatsReply, SwitchMessage, SwitchResult};
    use ofctl_types::{DatapathId, PortNo};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(super) struct MockSwitch {
        pub(super) sent: Mutex<Vec<SwitchMessage>>,
    }

    #[async_trait::async_trait]
    impl SwitchConnection for MockSwitch {
        fn datapath_id(&self) -> DatapathId {
            DatapathId::new(1)
        }

        async fn send(&self, message: SwitchMessage) -> SwitchResult<()> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_features_install_table_miss() {
        let mut controller = Controller::new(&ControllerConfig::default());
        let switch = Arc::new(MockSwitch::default());

        controller
            .dispatch(
                switch.clone(),
                SwitchEvent::Features(SwitchFeatures {
                    n_buffers: 256,
                    n_tables: 254,
                }),
            )
            .await
            .unwrap();

        let sent = switch.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let SwitchMessage::FlowMod(rule) = &sent[0] else {
            panic!("expected a flow mod");
        };
        assert!(rule.match_fields.is_wildcard());
        assert_eq!(rule.priority, 0);
        assert_eq!(rule.actions, vec![Action::output(PortNo::CONTROLLER)]);
    }

    #[tokio::test]
    async fn test_stats_reply_while_idle() {
        let mut controller = Controller::new(&ControllerConfig::default());
        let switch = Arc::new(MockSwitch::default());

        let reply = PortStatsReply {
            stats: vec![PortStats {
                port_no: PortNo::new(1),
                rx_packets: 5,
                tx_packets: 6,
            }],
        };
        controller
            .dispatch(switch.clone(), SwitchEvent::PortStatsReply(reply))
            .await
            .unwrap();

        assert_eq!(controller.poller().state(), PollState::Idle);
        assert_eq!(controller.poller().snapshot().records.len(), 1);
        assert!(switch.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flow_removed_and_disconnect_are_log_only() {
        let mut controller = Controller::new(&ControllerConfig::default());
        let switch = Arc::new(MockSwitch::default());

        let removed = FlowRemoved {
            match_fields: ofctl_switch::api::Match::all(),
            priority: 0x8000,
            reason: 1,
            duration_sec: 60,
            packet_count: 12,
        };
        assert_eq!(removed.reason(), FlowRemovedReason::HardTimeout);

        controller
            .dispatch(switch.clone(), SwitchEvent::FlowRemoved(removed))
            .await
            .unwrap();
        controller
            .dispatch(switch.clone(), SwitchEvent::Disconnected)
            .await
            .unwrap();

        assert!(switch.sent.lock().unwrap().is_empty());
    }
}
