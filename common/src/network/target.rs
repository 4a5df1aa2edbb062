//! # Probe Targets
//!
//! The well-known hosts used to decide whether the Internet is reachable.
//!
//! Two ordered lists are kept apart on purpose:
//! * **Internet hosts**: raw IP addresses, probed for reachability. They bypass DNS
//!   entirely so a broken resolver cannot mask a working uplink.
//! * **Domains**: names that must resolve to at least one A record.

use std::net::{IpAddr, Ipv4Addr};

pub const DEFAULT_INTERNET_HOSTS: [IpAddr; 3] = [
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
    IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9)),
];

pub const DEFAULT_DOMAINS: [&str; 3] = ["google.com", "amazon.com", "facebook.com"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTargets {
    pub internet_hosts: Vec<IpAddr>,
    pub domains: Vec<String>,
}

impl ProbeTargets {
    pub fn new(internet_hosts: Vec<IpAddr>, domains: Vec<String>) -> Self {
        Self {
            internet_hosts,
            domains,
        }
    }
}

impl Default for ProbeTargets {
    fn default() -> Self {
        Self {
            internet_hosts: DEFAULT_INTERNET_HOSTS.to_vec(),
            domains: DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}
