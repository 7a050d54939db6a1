//! Rule-add requests.
//!
//! A [`FlowMod`] installs one rule on the switch: match these fields, apply
//! these actions, expire after these timeouts. Unset match fields are
//! wildcarded. An empty action list means drop.

use ofctl_types::{Ipv4Address, MacAddress, PortNo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default rule priority (OFP_DEFAULT_PRIORITY).
pub const DEFAULT_PRIORITY: u16 = 0x8000;

/// Ethertype of IPv4, the prerequisite for matching on IPv4 addresses.
pub const ETH_TYPE_IPV4: u16 = 0x0800;

/// Match fields of a rule. `None` means wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_port: Option<PortNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_dst: Option<MacAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_type: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_src: Option<Ipv4Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_dst: Option<Ipv4Address>,
}

impl Match {
    /// Matches every packet.
    pub fn all() -> Self {
        Self::default()
    }

    /// Exact ingress port and destination MAC.
    pub fn in_port_eth_dst(in_port: PortNo, eth_dst: MacAddress) -> Self {
        Self {
            in_port: Some(in_port),
            eth_dst: Some(eth_dst),
            ..Self::default()
        }
    }

    /// Exact IPv4 source and destination (carries the IPv4 ethertype prerequisite).
    pub fn ipv4_pair(src: Ipv4Address, dst: Ipv4Address) -> Self {
        Self {
            eth_type: Some(ETH_TYPE_IPV4),
            ipv4_src: Some(src),
            ipv4_dst: Some(dst),
            ..Self::default()
        }
    }

    /// Returns true if no field is constrained.
    pub fn is_wildcard(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return f.write_str("*");
        }

        let mut fields = Vec::new();
        if let Some(port) = self.in_port {
            fields.push(format!("in_port={}", port));
        }
        if let Some(mac) = self.eth_dst {
            fields.push(format!("eth_dst={}", mac));
        }
        if let Some(eth_type) = self.eth_type {
            fields.push(format!("eth_type=0x{:04x}", eth_type));
        }
        if let Some(src) = self.ipv4_src {
            fields.push(format!("ipv4_src={}", src));
        }
        if let Some(dst) = self.ipv4_dst {
            fields.push(format!("ipv4_dst={}", dst));
        }
        f.write_str(&fields.join(","))
    }
}

/// A forwarding action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Send the packet out of a port or pseudo-port.
    Output { port: PortNo },
}

impl Action {
    pub fn output(port: PortNo) -> Self {
        Action::Output { port }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Output { port } => write!(f, "output:{}", port),
        }
    }
}

/// Rule flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowModFlags {
    /// Ask the switch for a flow-removed notification when the rule expires.
    pub send_flow_rem: bool,
}

/// A rule-add request.
///
/// Timeouts are in seconds; zero disables the timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMod {
    #[serde(rename = "match")]
    pub match_fields: Match,
    pub actions: Vec<Action>,
    pub priority: u16,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub flags: FlowModFlags,
}

impl FlowMod {
    /// Creates a permanent, default-priority rule with no actions.
    pub fn add(match_fields: Match) -> Self {
        Self {
            match_fields,
            actions: Vec::new(),
            priority: DEFAULT_PRIORITY,
            idle_timeout: 0,
            hard_timeout: 0,
            flags: FlowModFlags::default(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_hard_timeout(mut self, seconds: u16) -> Self {
        self.hard_timeout = seconds;
        self
    }

    /// Requests a flow-removed notification on expiry.
    pub fn notify_on_removal(mut self) -> Self {
        self.flags.send_flow_rem = true;
        self
    }

    /// Returns true if matching packets are dropped.
    pub fn is_drop(&self) -> bool {
        self.actions.is_empty()
    }
}
