//! Common types for the switch controller.
//!
//! This crate provides type-safe representations of the network primitives
//! the controller reasons about:
//!
//! - [`MacAddress`]: 48-bit Ethernet hardware addresses
//! - [`Ipv4Address`]: IPv4 host addresses
//! - [`PortNo`]: OpenFlow port numbers, including the reserved pseudo-ports
//! - [`DatapathId`]: the identifier of one controlled switch

mod ip;
mod mac;
mod port;

pub use ip::Ipv4Address;
pub use mac::MacAddress;
pub use port::{DatapathId, PortNo};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IPv4 address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid port number: {0}")]
    InvalidPortNo(String),

    #[error("invalid datapath id: {0}")]
    InvalidDatapathId(String),
}
