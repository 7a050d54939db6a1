//! Small protocol-level value types shared by requests and notifications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a packet held in the switch's buffer.
///
/// A packet-in either names a buffered packet or carries
/// [`BufferId::NO_BUFFER`], in which case the full frame travels with the
/// notification and must be sent back with the packet-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BufferId(u32);

impl BufferId {
    pub const NO_BUFFER: BufferId = BufferId(0xffff_ffff);

    pub const fn new(id: u32) -> Self {
        BufferId(id)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn is_buffered(&self) -> bool {
        *self != Self::NO_BUFFER
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_buffered() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("NO_BUFFER")
        }
    }
}

/// Why a port-status notification was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortReason {
    Add,
    Delete,
    Modify,
}

impl PortReason {
    /// Decodes the raw reason code; unknown codes yield `None`.
    pub fn from_raw(code: u8) -> Option<Self> {
        match code {
            0 => Some(PortReason::Add),
            1 => Some(PortReason::Delete),
            2 => Some(PortReason::Modify),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortReason::Add => "add",
            PortReason::Delete => "delete",
            PortReason::Modify => "modify",
        }
    }
}

impl fmt::Display for PortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the switch evicted a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowRemovedReason {
    IdleTimeout,
    HardTimeout,
    Delete,
    GroupDelete,
    Unknown(u8),
}

impl From<u8> for FlowRemovedReason {
    fn from(code: u8) -> Self {
        match code {
            0 => FlowRemovedReason::IdleTimeout,
            1 => FlowRemovedReason::HardTimeout,
            2 => FlowRemovedReason::Delete,
            3 => FlowRemovedReason::GroupDelete,
            other => FlowRemovedReason::Unknown(other),
        }
    }
}

impl fmt::Display for FlowRemovedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowRemovedReason::IdleTimeout => f.write_str("idle_timeout"),
            FlowRemovedReason::HardTimeout => f.write_str("hard_timeout"),
            FlowRemovedReason::Delete => f.write_str("delete"),
            FlowRemovedReason::GroupDelete => f.write_str("group_delete"),
            FlowRemovedReason::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}
