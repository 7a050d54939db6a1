//! Flow rule synthesis.
//!
//! Builds the three kinds of rule the controller installs and sends them to
//! a switch. Send failures are returned to the caller; nothing is retried.

use crate::config::TimersConfig;
use crate::error::Result;
use ofctl_switch::api::{Action, FlowMod, Match};
use ofctl_switch::SwitchConnection;
use ofctl_types::{Ipv4Address, MacAddress, PortNo};
use tracing::debug;

/// Priority of the table-miss rule (lowest).
pub const TABLE_MISS_PRIORITY: u16 = 0;

/// Builds and installs forwarding, blocking and table-miss rules.
#[derive(Debug, Clone, Copy)]
pub struct FlowRuleSynthesizer {
    forward_hard_timeout: u16,
    block_hard_timeout: u16,
}

impl FlowRuleSynthesizer {
    pub fn new(timers: &TimersConfig) -> Self {
        Self {
            forward_hard_timeout: timers.forward_hard_timeout_secs,
            block_hard_timeout: timers.block_hard_timeout_secs,
        }
    }

    /// Rule matching exactly (in_port, eth_dst).
    pub fn forward_rule(
        &self,
        in_port: PortNo,
        eth_dst: MacAddress,
        actions: Vec<Action>,
    ) -> FlowMod {
        FlowMod::add(Match::in_port_eth_dst(in_port, eth_dst))
            .with_actions(actions)
            .with_hard_timeout(self.forward_hard_timeout)
            .notify_on_removal()
    }

    /// Drop rules for a→b and b→a, in that order.
    pub fn block_rules(&self, a: Ipv4Address, b: Ipv4Address) -> [FlowMod; 2] {
        [self.block_rule(a, b), self.block_rule(b, a)]
    }

    fn block_rule(&self, src: Ipv4Address, dst: Ipv4Address) -> FlowMod {
        FlowMod::add(Match::ipv4_pair(src, dst))
            .with_hard_timeout(self.block_hard_timeout)
            .notify_on_removal()
    }

    /// Lowest-priority match-all rule sending unmatched packets to the controller.
    pub fn table_miss_rule(&self) -> FlowMod {
        FlowMod::add(Match::all())
            .with_actions(vec![Action::output(PortNo::CONTROLLER)])
            .with_priority(TABLE_MISS_PRIORITY)
    }

    pub async fn install_forward(
        &self,
        switch: &dyn SwitchConnection,
        in_port: PortNo,
        eth_dst: MacAddress,
        actions: Vec<Action>,
    ) -> Result<()> {
        let rule = self.forward_rule(in_port, eth_dst, actions);
        debug!(
            dpid = %switch.datapath_id(),
            rule = %rule.match_fields,
            "installing forward rule"
        );
        switch.send(rule.into()).await?;
        Ok(())
    }

    pub async fn install_block(
        &self,
        switch: &dyn SwitchConnection,
        a: Ipv4Address,
        b: Ipv4Address,
    ) -> Result<()> {
        for rule in self.block_rules(a, b) {
            debug!(
                dpid = %switch.datapath_id(),
                rule = %rule.match_fields,
                "installing block rule"
            );
            switch.send(rule.into()).await?;
        }
        Ok(())
    }

    pub async fn install_table_miss(&self, switch: &dyn SwitchConnection) -> Result<()> {
        debug!(dpid = %switch.datapath_id(), "installing table-miss rule");
        switch.send(self.table_miss_rule().into()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofctl_switch::api::{DEFAULT_PRIORITY, ETH_TYPE_IPV4};
    use ofctl_switch::{SwitchError, SwitchMessage, SwitchResult};
    use ofctl_types::DatapathId;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSwitch {
        sent: Mutex<Vec<SwitchMessage>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl SwitchConnection for MockSwitch {
        fn datapath_id(&self) -> DatapathId {
            DatapathId::new(1)
        }

        async fn send(&self, message: SwitchMessage) -> SwitchResult<()> {
            if self.fail {
                return Err(SwitchError::send(self.datapath_id(), message.kind(), "closed"));
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    impl MockSwitch {
        fn flow_mods(&self) -> Vec<FlowMod> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter_map(|m| match m {
                    SwitchMessage::FlowMod(rule) => Some(rule.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    fn synthesizer() -> FlowRuleSynthesizer {
        FlowRuleSynthesizer::new(&TimersConfig::default())
    }

    #[test]
    fn test_forward_rule_shape() {
        let dst = MacAddress::new([0, 0, 0, 0, 0, 2]);
        let actions = vec![Action::output(PortNo::new(2))];
        let rule = synthesizer().forward_rule(PortNo::new(1), dst, actions);

        assert_eq!(rule.match_fields, Match::in_port_eth_dst(PortNo::new(1), dst));
        assert_eq!(rule.actions, vec![Action::output(PortNo::new(2))]);
        assert_eq!(rule.priority, DEFAULT_PRIORITY);
        assert_eq!(rule.hard_timeout, 60);
        assert_eq!(rule.idle_timeout, 0);
        assert!(rule.flags.send_flow_rem);
    }

    #[test]
    fn test_block_rules_shape() {
        let a = Ipv4Address::new(10, 0, 0, 2);
        let b = Ipv4Address::new(10, 0, 0, 3);
        let [first, second] = synthesizer().block_rules(a, b);

        assert_eq!(first.match_fields.ipv4_src, Some(a));
        assert_eq!(first.match_fields.ipv4_dst, Some(b));
        assert_eq!(second.match_fields.ipv4_src, Some(b));
        assert_eq!(second.match_fields.ipv4_dst, Some(a));

        for rule in [first, second] {
            assert_eq!(rule.match_fields.eth_type, Some(ETH_TYPE_IPV4));
            assert_eq!(rule.match_fields.in_port, None);
            assert!(rule.is_drop());
            assert_eq!(rule.priority, DEFAULT_PRIORITY);
            assert_eq!(rule.hard_timeout, 10);
            assert_eq!(rule.idle_timeout, 0);
            assert!(rule.flags.send_flow_rem);
        }
    }

    #[test]
    fn test_configured_timeouts() {
        let timers = TimersConfig {
            forward_hard_timeout_secs: 120,
            block_hard_timeout_secs: 5,
            ..TimersConfig::default()
        };
        let synth = FlowRuleSynthesizer::new(&timers);
        let rule = synth.forward_rule(PortNo::new(1), MacAddress::new([2; 6]), Vec::new());
        assert_eq!(rule.hard_timeout, 120);

        let [rule, _] =
            synth.block_rules(Ipv4Address::new(1, 1, 1, 1), Ipv4Address::new(2, 2, 2, 2));
        assert_eq!(rule.hard_timeout, 5);
    }

    #[test]
    fn test_table_miss_rule_shape() {
        let rule = synthesizer().table_miss_rule();
        assert!(rule.match_fields.is_wildcard());
        assert_eq!(rule.priority, TABLE_MISS_PRIORITY);
        assert_eq!(rule.actions, vec![Action::output(PortNo::CONTROLLER)]);
        assert_eq!(rule.hard_timeout, 0);
        assert!(!rule.flags.send_flow_rem);
    }

    #[tokio::test]
    async fn test_install_block_sends_two_rules() {
        let switch = MockSwitch::default();
        synthesizer()
            .install_block(&switch, Ipv4Address::new(10, 0, 0, 2), Ipv4Address::new(10, 0, 0, 3))
            .await
            .unwrap();
        assert_eq!(switch.flow_mods().len(), 2);
    }

    #[tokio::test]
    async fn test_install_forward_sends_one_rule() {
        let switch = MockSwitch::default();
        synthesizer()
            .install_forward(
                &switch,
                PortNo::new(3),
                MacAddress::new([2; 6]),
                vec![Action::output(PortNo::new(1))],
            )
            .await
            .unwrap();

        let rules = switch.flow_mods();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].match_fields.in_port, Some(PortNo::new(3)));
    }

    #[tokio::test]
    async fn test_send_failure_propagates() {
        let switch = MockSwitch {
            fail: true,
            ..MockSwitch::default()
        };
        let err = synthesizer().install_table_miss(&switch).await.unwrap_err();
        assert!(matches!(err, crate::error::ControllerError::Switch(_)));
    }
}
