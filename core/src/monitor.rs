//! # Connectivity Monitor
//!
//! Answers "is the Internet up?" and, when it is not, walks an escalating
//! remediation ladder before giving a final verdict:
//!
//! 1. **Checking**: every internet host is pinged (with retries) and every
//!    domain is resolved (with retries). Both must succeed.
//! 2. **RouterDownRebooting**: the router is power-cycled when the
//!    [`FirstRebootPolicy`] says so (by default: the router does not answer).
//! 3. **ModemRebooting**: the modem is power-cycled.
//! 4. **RouterRebootingFinal**: the router is power-cycled one last time and the
//!    outcome of the following check is the verdict.
//!
//! After each reboot the monitor waits `post_reboot_delay` and repeats step 1.
//! At most three reboots happen per invocation and the ladder never loops.

use std::fmt;
use std::net::IpAddr;

use tracing::{debug, info, warn};

use rebootr_common::capability::{Pause, Pinger, PowerControl, RecordResolver, Sleeper};
use rebootr_common::config::{FirstRebootPolicy, MonitorConfig};
use rebootr_common::network::device::Device;
use rebootr_common::{Result, success};

use crate::failure::{FailureInjector, GatedCheck, NoFailures, RandomFailures};
use crate::power::Switchboard;
use crate::probe::{NameResolutionProbe, ReachabilityProbe};
use crate::retry::RetryingCheck;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorState {
    Checking,
    RouterDownRebooting,
    ModemRebooting,
    RouterRebootingFinal,
    Up,
    Down,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            MonitorState::Checking => "CHECKING",
            MonitorState::RouterDownRebooting => "ROUTER_DOWN_REBOOTING",
            MonitorState::ModemRebooting => "MODEM_REBOOTING",
            MonitorState::RouterRebootingFinal => "ROUTER_REBOOTING_FINAL",
            MonitorState::Up => "UP",
            MonitorState::Down => "DOWN",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Up,
    Down,
}

impl Verdict {
    pub fn is_up(self) -> bool {
        self == Verdict::Up
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Up => f.write_str("UP"),
            Verdict::Down => f.write_str("DOWN"),
        }
    }
}

/// Everything that happened during one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    /// States in the order they were entered, ending in `Up` or `Down`.
    pub states: Vec<MonitorState>,
    /// Devices in the order they were power-cycled.
    pub reboots: Vec<Device>,
}

#[derive(Default)]
struct Trail {
    states: Vec<MonitorState>,
    reboots: Vec<Device>,
}

impl Trail {
    fn enter(&mut self, state: MonitorState) {
        info!(state = %state, "Entering {state}");
        self.states.push(state);
    }

    fn finish(mut self, verdict: Verdict) -> Outcome {
        let state: MonitorState = match verdict {
            Verdict::Up => MonitorState::Up,
            Verdict::Down => MonitorState::Down,
        };
        self.states.push(state);
        match verdict {
            Verdict::Up => success!(state = %state, reboots = self.reboots.len(), "Internet is up"),
            Verdict::Down => warn!(state = %state, reboots = self.reboots.len(), "Internet is down. Giving up"),
        }
        Outcome {
            verdict,
            states: self.states,
            reboots: self.reboots,
        }
    }
}

pub struct ConnectivityMonitor<'a> {
    config: MonitorConfig,
    pinger: Box<dyn Pinger + 'a>,
    resolver: Box<dyn RecordResolver + 'a>,
    power: Box<dyn PowerControl + 'a>,
    sleeper: Box<dyn Sleeper + 'a>,
    injector: Box<dyn FailureInjector + 'a>,
}

impl<'a> ConnectivityMonitor<'a> {
    /// Validates `config` and wires the capabilities together.
    ///
    /// With `produce_random_failures` set, checks fail at random with the
    /// configured odds; see [`ConnectivityMonitor::with_failure_injector`] to
    /// substitute a deterministic source.
    pub fn new(
        config: MonitorConfig,
        pinger: impl Pinger + 'a,
        resolver: impl RecordResolver + 'a,
        power: impl PowerControl + 'a,
        sleeper: impl Sleeper + 'a,
    ) -> Result<Self> {
        config.validate()?;
        let injector: Box<dyn FailureInjector + 'a> = if config.produce_random_failures {
            Box::new(RandomFailures::new(config.failure_odds))
        } else {
            Box::new(NoFailures)
        };

        Ok(Self {
            config,
            pinger: Box::new(pinger),
            resolver: Box::new(resolver),
            power: Box::new(power),
            sleeper: Box::new(sleeper),
            injector,
        })
    }

    /// Replaces the failure source. Only consulted when
    /// `produce_random_failures` is enabled.
    pub fn with_failure_injector(mut self, injector: impl FailureInjector + 'a) -> Self {
        self.injector = Box::new(injector);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn is_internet_up(&self) -> Result<Verdict> {
        Ok(self.run()?.verdict)
    }

    /// One full pass through the remediation ladder.
    ///
    /// A check that fails while the router answers leads straight to the modem
    /// reboot; the combined check is only repeated after a reboot.
    pub fn run(&self) -> Result<Outcome> {
        let mut switchboard = Switchboard::new(
            self.power.as_ref(),
            self.sleeper.as_ref(),
            self.config.power_toggle_delay,
        );
        let mut trail = Trail::default();

        trail.enter(MonitorState::Checking);
        if self.check_connectivity()? {
            return Ok(trail.finish(Verdict::Up));
        }

        if self.first_reboot_warranted()? {
            trail.enter(MonitorState::RouterDownRebooting);
            self.reboot(&mut switchboard, &mut trail, Device::Router)?;
            if self.check_connectivity()? {
                return Ok(trail.finish(Verdict::Up));
            }
        }

        trail.enter(MonitorState::ModemRebooting);
        info!("Internet is not reachable. Rebooting modem...");
        self.reboot(&mut switchboard, &mut trail, Device::Modem)?;
        if self.check_connectivity()? {
            return Ok(trail.finish(Verdict::Up));
        }

        trail.enter(MonitorState::RouterRebootingFinal);
        info!("Internet is not reachable. Rebooting router...");
        self.reboot(&mut switchboard, &mut trail, Device::Router)?;
        let verdict: Verdict = if self.check_connectivity()? {
            Verdict::Up
        } else {
            Verdict::Down
        };

        Ok(trail.finish(verdict))
    }

    /// Internet hosts answer and domains resolve. No remediation.
    pub fn check_connectivity(&self) -> Result<bool> {
        if !self.internet_reachable()? {
            warn!("No internet host answered");
            return Ok(false);
        }
        if !self.dns_resolves()? {
            warn!("No domain resolved");
            return Ok(false);
        }
        Ok(true)
    }

    pub fn internet_reachable(&self) -> Result<bool> {
        if self.unlucky(GatedCheck::InternetReachable) {
            return Ok(false);
        }
        let probe = ReachabilityProbe::new(self.pinger.as_ref());
        RetryingCheck::new(self.config.retry, self.sleeper.as_ref())
            .run(&self.config.targets.internet_hosts, |host| probe.probe(host))
    }

    pub fn dns_resolves(&self) -> Result<bool> {
        if self.unlucky(GatedCheck::DnsResolves) {
            return Ok(false);
        }
        let probe = NameResolutionProbe::new(self.resolver.as_ref());
        RetryingCheck::new(self.config.retry, self.sleeper.as_ref())
            .run(&self.config.targets.domains, |host| probe.probe(host))
    }

    /// Single ping, no retries.
    pub fn router_reachable(&self) -> Result<bool> {
        if self.unlucky(GatedCheck::RouterReachable) {
            return Ok(false);
        }
        ReachabilityProbe::new(self.pinger.as_ref()).probe(&self.config.router_ip)
    }

    fn first_reboot_warranted(&self) -> Result<bool> {
        match self.config.first_reboot {
            FirstRebootPolicy::RouterUnreachable => {
                if self.router_reachable()? {
                    return Ok(false);
                }
                info!(
                    router = %self.config.router_ip,
                    "Router {} is not reachable. Rebooting...",
                    self.config.router_ip
                );
                Ok(true)
            }
            FirstRebootPolicy::Always => {
                info!("Rebooting router before the modem...");
                Ok(true)
            }
            FirstRebootPolicy::Never => Ok(false),
        }
    }

    fn reboot(&self, switchboard: &mut Switchboard<'_>, trail: &mut Trail, device: Device) -> Result<()> {
        let outlet: IpAddr = self.outlet_for(device);
        switchboard.reboot(outlet)?;
        trail.reboots.push(device);

        info!(
            device = %device,
            "Rebooted {device}. Waiting for {} seconds...",
            self.config.post_reboot_delay.as_secs()
        );
        self.sleeper
            .pause(Pause::Recovery { device }, self.config.post_reboot_delay);
        Ok(())
    }

    fn outlet_for(&self, device: Device) -> IpAddr {
        match device {
            Device::Router => self.config.router_plug_ip,
            Device::Modem => self.config.modem_plug_ip,
        }
    }

    fn unlucky(&self, check: GatedCheck) -> bool {
        let unlucky: bool =
            self.config.produce_random_failures && self.injector.out_of_luck(check);
        if unlucky {
            debug!(check = %check, "synthetic failure injected");
        }
        unlucky
    }
}
