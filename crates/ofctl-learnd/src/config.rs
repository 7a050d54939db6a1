//! Configuration file support for the controller.
//!
//! Host identities and timer values are loaded from a TOML file. Every field
//! has a default, so an empty file (or no file at all) yields the standard
//! three-host lab setup:
//!
//! ```toml
//! [hosts.host1]
//! mac = "00:00:00:00:00:01"
//! ip = "10.0.0.1"
//!
//! [hosts.host2]
//! mac = "00:00:00:00:00:02"
//! ip = "10.0.0.2"
//!
//! [hosts.host3]
//! mac = "00:00:00:00:00:03"
//! ip = "10.0.0.3"
//!
//! [timers]
//! forward_hard_timeout_secs = 60
//! block_hard_timeout_secs = 10
//! poll_interval_secs = 1
//! ```

use crate::error::{ControllerError, Result};
use ofctl_types::{Ipv4Address, MacAddress};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Hardware and network address of one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    pub mac: MacAddress,
    pub ip: Ipv4Address,
}

/// The three hosts the controller knows by identity.
///
/// host1's port is discovered at runtime and polled for counters; traffic
/// between host2 and host3 is blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostsConfig {
    #[serde(default = "default_host1")]
    pub host1: HostConfig,

    #[serde(default = "default_host2")]
    pub host2: HostConfig,

    #[serde(default = "default_host3")]
    pub host3: HostConfig,
}

/// Rule lifetimes and the counter polling period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersConfig {
    /// Hard timeout of forwarding rules in seconds
    #[serde(default = "default_forward_hard_timeout")]
    pub forward_hard_timeout_secs: u16,

    /// Hard timeout of blocking rules in seconds
    #[serde(default = "default_block_hard_timeout")]
    pub block_hard_timeout_secs: u16,

    /// Delay between a counters reply and the next request
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

/// Complete controller configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub hosts: HostsConfig,

    #[serde(default)]
    pub timers: TimersConfig,
}

// Default functions
fn default_host1() -> HostConfig {
    HostConfig {
        mac: MacAddress::new([0, 0, 0, 0, 0, 1]),
        ip: Ipv4Address::new(10, 0, 0, 1),
    }
}

fn default_host2() -> HostConfig {
    HostConfig {
        mac: MacAddress::new([0, 0, 0, 0, 0, 2]),
        ip: Ipv4Address::new(10, 0, 0, 2),
    }
}

fn default_host3() -> HostConfig {
    HostConfig {
        mac: MacAddress::new([0, 0, 0, 0, 0, 3]),
        ip: Ipv4Address::new(10, 0, 0, 3),
    }
}

fn default_forward_hard_timeout() -> u16 {
    60
}

fn default_block_hard_timeout() -> u16 {
    10
}

fn default_poll_interval() -> u64 {
    1
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            host1: default_host1(),
            host2: default_host2(),
            host3: default_host3(),
        }
    }
}

impl Default for TimersConfig {
    fn default() -> Self {
        Self {
            forward_hard_timeout_secs: default_forward_hard_timeout(),
            block_hard_timeout_secs: default_block_hard_timeout(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl ControllerConfig {
    /// Parses and validates a configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ControllerError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.timers.poll_interval_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.timers.forward_hard_timeout_secs == 0 {
            return Err(ControllerError::config(
                "timers.forward_hard_timeout_secs",
                "must be > 0",
            ));
        }

        if self.timers.block_hard_timeout_secs == 0 {
            return Err(ControllerError::config(
                "timers.block_hard_timeout_secs",
                "must be > 0",
            ));
        }

        if self.timers.poll_interval_secs == 0 {
            return Err(ControllerError::config(
                "timers.poll_interval_secs",
                "must be > 0",
            ));
        }

        let hosts = &self.hosts;
        if hosts.host1.mac == hosts.host2.mac
            || hosts.host1.mac == hosts.host3.mac
            || hosts.host2.mac == hosts.host3.mac
        {
            return Err(ControllerError::config(
                "hosts",
                "host MAC addresses must be distinct",
            ));
        }

        if hosts.host2.ip == hosts.host3.ip {
            return Err(ControllerError::config(
                "hosts",
                format!("host2 and host3 share address {}", hosts.host2.ip),
            ));
        }

        Ok(())
    }
}
