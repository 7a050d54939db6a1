//! Traffic classifier for the blocked host pair.
//!
//! The frame is walked layer by layer: Ethernet, any stacked VLAN tags, then
//! IPv4 and any IPv4-in-IPv4 encapsulation below it. A frame is blocked when
//! any IPv4 layer carries the blocked pair in either direction.

use etherparse::{Ethernet2HeaderSlice, Ipv4HeaderSlice};
use ofctl_types::Ipv4Address;

const ETH_TYPE_IPV4: u16 = 0x0800;
const ETH_TYPE_VLAN: u16 = 0x8100;
const ETH_TYPE_QINQ: u16 = 0x88a8;
const ETH_TYPE_QINQ_OLD: u16 = 0x9100;
const VLAN_TAG_LEN: usize = 4;
const IP_PROTO_IPIP: u8 = 4;

/// Decides whether a frame belongs to the blocked host pair.
#[derive(Debug, Clone, Copy)]
pub struct TrafficClassifier {
    a: Ipv4Address,
    b: Ipv4Address,
}

impl TrafficClassifier {
    pub fn new(a: Ipv4Address, b: Ipv4Address) -> Self {
        Self { a, b }
    }

    /// Returns true if any IPv4 layer of `frame` is a→b or b→a.
    ///
    /// Frames without an IPv4 layer, or that stop decoding before one, are
    /// not blocked.
    pub fn is_blocked_flow(&self, frame: &[u8]) -> bool {
        ipv4_layers(frame).any(|(src, dst)| self.matches(src, dst))
    }

    fn matches(&self, src: Ipv4Address, dst: Ipv4Address) -> bool {
        (src == self.a && dst == self.b) || (src == self.b && dst == self.a)
    }
}

/// Iterates the (source, destination) pair of every IPv4 layer in a frame.
fn ipv4_layers(frame: &[u8]) -> impl Iterator<Item = (Ipv4Address, Ipv4Address)> + '_ {
    let mut next = ipv4_payload(frame);
    std::iter::from_fn(move || {
        let data = next.take()?;
        let ip = Ipv4HeaderSlice::from_slice(data).ok()?;
        let header_len = ip.slice().len();

        if ip.protocol().0 == IP_PROTO_IPIP {
            next = data.get(header_len..);
        }

        Some((Ipv4Address::from(ip.source()), Ipv4Address::from(ip.destination())))
    })
}

/// Skips the Ethernet header and VLAN tags. Returns the network layer bytes
/// when the frame carries IPv4.
fn ipv4_payload(frame: &[u8]) -> Option<&[u8]> {
    let eth = Ethernet2HeaderSlice::from_slice(frame).ok()?;
    let mut ether_type = eth.ether_type().0;
    let mut rest = frame.get(eth.slice().len()..)?;

    while matches!(ether_type, ETH_TYPE_VLAN | ETH_TYPE_QINQ | ETH_TYPE_QINQ_OLD) {
        let tag = rest.get(..VLAN_TAG_LEN)?;
        ether_type = u16::from_be_bytes([tag[2], tag[3]]);
        rest = &rest[VLAN_TAG_LEN..];
    }

    (ether_type == ETH_TYPE_IPV4).then_some(rest)
}
