//! Known host identities and the discovered port of host1.

use crate::config::{HostConfig, HostsConfig};
use ofctl_types::{Ipv4Address, MacAddress, PortNo};
use tracing::info;

/// Static host identities plus the one piece of runtime discovery.
///
/// `host1_port` starts unknown and is latched by the first frame whose
/// source MAC is host1's. It never changes afterwards, even if host1 is later
/// seen on another port.
#[derive(Debug, Clone)]
pub struct HostRegistry {
    host1: HostConfig,
    host2: HostConfig,
    host3: HostConfig,
    host1_port: Option<PortNo>,
}

impl HostRegistry {
    pub fn new(hosts: &HostsConfig) -> Self {
        Self {
            host1: hosts.host1,
            host2: hosts.host2,
            host3: hosts.host3,
            host1_port: None,
        }
    }

    pub fn host1_mac(&self) -> MacAddress {
        self.host1.mac
    }

    pub fn host1_port(&self) -> Option<PortNo> {
        self.host1_port
    }

    /// The IPv4 pair whose traffic is dropped in both directions.
    pub fn blocked_pair(&self) -> (Ipv4Address, Ipv4Address) {
        (self.host2.ip, self.host3.ip)
    }

    /// Records that `src` was seen on `in_port`.
    ///
    /// Returns the newly latched port if this observation discovered host1.
    pub fn observe(&mut self, src: MacAddress, in_port: PortNo) -> Option<PortNo> {
        if self.host1_port.is_some() || src != self.host1.mac {
            return None;
        }

        info!(
            mac = %src,
            ip = %self.host1.ip,
            port = %in_port,
            "host1 discovered"
        );
        self.host1_port = Some(in_port);
        self.host1_port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> HostRegistry {
        HostRegistry::new(&HostsConfig::default())
    }

    #[test]
    fn test_unknown_until_host1_seen() {
        let mut hosts = registry();
        assert_eq!(hosts.host1_port(), None);

        let other: MacAddress = "00:00:00:00:00:02".parse().unwrap();
        assert_eq!(hosts.observe(other, PortNo::new(2)), None);
        assert_eq!(hosts.host1_port(), None);
    }

    #[test]
    fn test_first_observation_latches() {
        let mut hosts = registry();
        let host1 = hosts.host1_mac();

        assert_eq!(hosts.observe(host1, PortNo::new(1)), Some(PortNo::new(1)));
        assert_eq!(hosts.host1_port(), Some(PortNo::new(1)));

        // host1 moving does not move the latch.
        assert_eq!(hosts.observe(host1, PortNo::new(4)), None);
        assert_eq!(hosts.host1_port(), Some(PortNo::new(1)));
    }

    #[test]
    fn test_blocked_pair() {
        let hosts = registry();
        assert_eq!(
            hosts.blocked_pair(),
            (Ipv4Address::new(10, 0, 0, 2), Ipv4Address::new(10, 0, 0, 3))
        );
    }
}
