use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use rebootr_common::capability::{Pause, Pinger, PowerControl, RecordResolver, RecordType, Sleeper};
use rebootr_common::config::{MonitorConfig, RetryPolicy};
use rebootr_common::network::device::PowerAction;
use rebootr_common::network::target::ProbeTargets;
use rebootr_common::{Error, Result};
use rebootr_core::failure::{FailureInjector, GatedCheck};

pub const ROUTER: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1));
pub const ROUTER_PLUG: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 50));
pub const MODEM_PLUG: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 51));
pub const INTERNET_HOST: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
pub const DOMAIN: &str = "example.com";

/// Single host, single domain, no retries, default delays (never actually slept).
pub fn config() -> MonitorConfig {
    MonitorConfig::new(ROUTER, ROUTER_PLUG, MODEM_PLUG)
        .with_retry(RetryPolicy::single_attempt())
        .with_targets(ProbeTargets::new(vec![INTERNET_HOST], vec![DOMAIN.to_string()]))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ping(IpAddr),
    Lookup(String, RecordType),
    Power(IpAddr, PowerAction),
    Pause(Pause, Duration),
}

#[derive(Debug, Clone, Copy)]
struct Links {
    router: bool,
    uplink: bool,
    dns: bool,
}

/// A home network whose state changes only when outlets are switched.
///
/// Powering the router outlet back on always brings the router back. The
/// uplink (and DNS with it) comes back on the `nth` power-on of the outlet
/// given to [`FakeNetwork::cured_by`], and never otherwise.
pub struct FakeNetwork {
    links: Cell<Links>,
    cure: Option<(IpAddr, usize)>,
    power_ons: RefCell<HashMap<IpAddr, usize>>,
    broken_outlet: Option<IpAddr>,
    ping_missing: bool,
    events: RefCell<Vec<Event>>,
}

impl FakeNetwork {
    fn with_links(router: bool, uplink: bool, dns: bool) -> Self {
        Self {
            links: Cell::new(Links { router, uplink, dns }),
            cure: None,
            power_ons: RefCell::new(HashMap::new()),
            broken_outlet: None,
            ping_missing: false,
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn healthy() -> Self {
        Self::with_links(true, true, true)
    }

    /// Router answers, nothing beyond it does.
    pub fn offline() -> Self {
        Self::with_links(true, false, false)
    }

    /// Hosts answer but no name resolves.
    pub fn dns_broken() -> Self {
        Self::with_links(true, true, false)
    }

    pub fn with_router_down(self) -> Self {
        let mut links = self.links.get();
        links.router = false;
        self.links.set(links);
        self
    }

    pub fn cured_by(mut self, outlet: IpAddr, nth_power_on: usize) -> Self {
        self.cure = Some((outlet, nth_power_on));
        self
    }

    pub fn with_broken_outlet(mut self, outlet: IpAddr) -> Self {
        self.broken_outlet = Some(outlet);
        self
    }

    pub fn without_ping(mut self) -> Self {
        self.ping_missing = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn power_events(&self) -> Vec<(IpAddr, PowerAction)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Power(outlet, action) => Some((*outlet, *action)),
                _ => None,
            })
            .collect()
    }

    pub fn pauses(&self) -> Vec<Pause> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Pause(pause, _) => Some(*pause),
                _ => None,
            })
            .collect()
    }

    pub fn pings(&self, target: IpAddr) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| **event == Event::Ping(target))
            .count()
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn switch(&self, outlet: IpAddr, action: PowerAction) -> Result<()> {
        self.record(Event::Power(outlet, action));
        if self.broken_outlet == Some(outlet) {
            return Err(Error::dispatch(outlet, action, "no route to host"));
        }
        if action == PowerAction::Off {
            return Ok(());
        }

        let mut power_ons = self.power_ons.borrow_mut();
        let count: &mut usize = power_ons.entry(outlet).or_default();
        *count += 1;

        let mut links = self.links.get();
        if outlet == ROUTER_PLUG {
            links.router = true;
        }
        if self.cure == Some((outlet, *count)) {
            links = Links {
                router: true,
                uplink: true,
                dns: true,
            };
        }
        self.links.set(links);
        Ok(())
    }
}

impl Pinger for FakeNetwork {
    fn ping(&self, target: IpAddr) -> Result<bool> {
        if self.ping_missing {
            return Err(Error::probe_unavailable("ping", "ping: command not found"));
        }
        self.record(Event::Ping(target));
        let links = self.links.get();
        Ok(if target == ROUTER {
            links.router
        } else {
            links.uplink
        })
    }
}

impl RecordResolver for FakeNetwork {
    fn has_records(&self, host: &str, kind: RecordType) -> Result<bool> {
        self.record(Event::Lookup(host.to_string(), kind));
        Ok(self.links.get().dns)
    }
}

impl PowerControl for FakeNetwork {
    fn power_on(&self, outlet: IpAddr) -> Result<()> {
        self.switch(outlet, PowerAction::On)
    }

    fn power_off(&self, outlet: IpAddr) -> Result<()> {
        self.switch(outlet, PowerAction::Off)
    }
}

impl Sleeper for FakeNetwork {
    fn pause(&self, pause: Pause, duration: Duration) {
        self.record(Event::Pause(pause, duration));
    }
}

/// Injects failures for listed checks, a fixed number of times each.
#[derive(Default)]
pub struct ScriptedFailures {
    remaining: RefCell<HashMap<GatedCheck, u32>>,
}

impl ScriptedFailures {
    pub fn fail(self, check: GatedCheck, times: u32) -> Self {
        self.remaining.borrow_mut().insert(check, times);
        self
    }
}

impl FailureInjector for ScriptedFailures {
    fn out_of_luck(&self, check: GatedCheck) -> bool {
        match self.remaining.borrow_mut().get_mut(&check) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Fails every gated check.
pub struct AlwaysUnlucky;

impl FailureInjector for AlwaysUnlucky {
    fn out_of_luck(&self, _check: GatedCheck) -> bool {
        true
    }
}
