use std::net::IpAddr;

use tracing::debug;

use rebootr_common::Result;
use rebootr_common::capability::{Pinger, RecordResolver};

/// Is a host answering?
pub struct ReachabilityProbe<'a> {
    pinger: &'a dyn Pinger,
}

impl<'a> ReachabilityProbe<'a> {
    pub fn new(pinger: &'a dyn Pinger) -> Self {
        Self { pinger }
    }

    pub fn probe(&self, target: &IpAddr) -> Result<bool> {
        let reachable: bool = self.pinger.ping(*target)?;
        debug!(%target, reachable, "ping");
        Ok(reachable)
    }
}

/// Does a name resolve to at least one A record?
pub struct NameResolutionProbe<'a> {
    resolver: &'a dyn RecordResolver,
}

impl<'a> NameResolutionProbe<'a> {
    pub fn new(resolver: &'a dyn RecordResolver) -> Self {
        Self { resolver }
    }

    pub fn probe(&self, host: &str) -> Result<bool> {
        let resolves: bool = self.resolver.resolves_a_record(host)?;
        debug!(host, resolves, "dns lookup");
        Ok(resolves)
    }
}
