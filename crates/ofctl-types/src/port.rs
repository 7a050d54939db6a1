//! OpenFlow port numbers and switch identifiers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An OpenFlow 1.3 port number.
///
/// Values up to [`PortNo::MAX`] name physical or logical switch ports.
/// Values above it are reserved pseudo-ports such as [`PortNo::FLOOD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNo(u32);

impl PortNo {
    /// Highest number usable for a real port.
    pub const MAX: PortNo = PortNo(0xffff_ff00);
    /// Send the packet out the input port.
    pub const IN_PORT: PortNo = PortNo(0xffff_fff8);
    /// Submit the packet to the first flow table.
    pub const TABLE: PortNo = PortNo(0xffff_fff9);
    /// Forward using the switch's non-OpenFlow pipeline.
    pub const NORMAL: PortNo = PortNo(0xffff_fffa);
    /// Every port except the input port and blocked ports.
    pub const FLOOD: PortNo = PortNo(0xffff_fffb);
    /// Every port except the input port.
    pub const ALL: PortNo = PortNo(0xffff_fffc);
    /// Send to the controller.
    pub const CONTROLLER: PortNo = PortNo(0xffff_fffd);
    /// The switch's local networking stack.
    pub const LOCAL: PortNo = PortNo(0xffff_fffe);
    /// Wildcard port, also used to request statistics for all ports.
    pub const ANY: PortNo = PortNo(0xffff_ffff);

    pub const fn new(number: u32) -> Self {
        PortNo(number)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true for pseudo-ports that do not name a single switch port.
    pub const fn is_reserved(&self) -> bool {
        self.0 > Self::MAX.0
    }

    fn reserved_name(&self) -> Option<&'static str> {
        match *self {
            Self::IN_PORT => Some("IN_PORT"),
            Self::TABLE => Some("TABLE"),
            Self::NORMAL => Some("NORMAL"),
            Self::FLOOD => Some("FLOOD"),
            Self::ALL => Some("ALL"),
            Self::CONTROLLER => Some("CONTROLLER"),
            Self::LOCAL => Some("LOCAL"),
            Self::ANY => Some("ANY"),
            _ => None,
        }
    }
}

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reserved_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for PortNo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN_PORT" => Ok(Self::IN_PORT),
            "TABLE" => Ok(Self::TABLE),
            "NORMAL" => Ok(Self::NORMAL),
            "FLOOD" => Ok(Self::FLOOD),
            "ALL" => Ok(Self::ALL),
            "CONTROLLER" => Ok(Self::CONTROLLER),
            "LOCAL" => Ok(Self::LOCAL),
            "ANY" => Ok(Self::ANY),
            _ => s
                .parse::<u32>()
                .map(PortNo)
                .map_err(|_| ParseError::InvalidPortNo(s.to_string())),
        }
    }
}

impl From<u32> for PortNo {
    fn from(number: u32) -> Self {
        PortNo(number)
    }
}

/// Identifier of a controlled switch (the OpenFlow datapath id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatapathId(u64);

impl DatapathId {
    pub const fn new(id: u64) -> Self {
        DatapathId(id)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatapathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for DatapathId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        u64::from_str_radix(digits, 16)
            .map(DatapathId)
            .map_err(|_| ParseError::InvalidDatapathId(s.to_string()))
    }
}

impl From<u64> for DatapathId {
    fn from(id: u64) -> Self {
        DatapathId(id)
    }
}
