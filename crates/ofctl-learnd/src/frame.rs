//! Ethernet frame header access.

use crate::error::{ControllerError, Result};
use etherparse::Ethernet2HeaderSlice;
use ofctl_types::MacAddress;

/// Hardware addresses of the outer Ethernet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetAddresses {
    pub dst: MacAddress,
    pub src: MacAddress,
    pub ether_type: u16,
}

impl EthernetAddresses {
    /// Reads the outer Ethernet header of `frame`.
    ///
    /// Fails with [`ControllerError::MalformedFrame`] when the frame is
    /// shorter than an Ethernet header.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        let eth = Ethernet2HeaderSlice::from_slice(frame)
            .map_err(|e| ControllerError::malformed_frame(frame.len(), e.to_string()))?;

        Ok(Self {
            dst: MacAddress::new(eth.destination()),
            src: MacAddress::new(eth.source()),
            ether_type: eth.ether_type().0,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_addresses() {
        let dst: MacAddress = "00:00:00:00:00:02".parse().unwrap();
        let src: MacAddress = "00:00:00:00:00:01".parse().unwrap();
        let frame = ethernet(dst, src, ETH_TYPE_ARP, &[0u8; 28]);

        let addrs = EthernetAddresses::parse(&frame).unwrap();
        assert_eq!(addrs.dst, dst);
        assert_eq!(addrs.src, src);
        assert_eq!(addrs.ether_type, ETH_TYPE_ARP);
    }

    #[test]
    fn test_header_only_frame() {
        let frame = ethernet(MacAddress::BROADCAST, MacAddress::new([2; 6]), 0x88cc, &[]);
        assert_eq!(frame.len(), ETHERNET_HEADER_LEN);
        assert!(EthernetAddresses::parse(&frame).is_ok());
    }

    #[test]
    fn test_short_frame_rejected() {
        let err = EthernetAddresses::parse(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, ControllerError::MalformedFrame { len: 10, .. }));

        assert!(EthernetAddresses::parse(&[]).is_err());
    }
}
