//! The three narrow interfaces the monitor talks to the outside world through,
//! plus the pause hook that keeps blocking waits out of the decision logic.
//!
//! Implementations live in `rebootr-core` (OS `ping`, UDP DNS, TP-Link outlets)
//! and in the test crates (in-memory fakes).

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use crate::Result;
use crate::network::device::Device;

/// DNS record kinds a resolver can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordType {
    #[default]
    A,
    Mx,
    Ns,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::Mx => f.write_str("MX"),
            RecordType::Ns => f.write_str("NS"),
        }
    }
}

/// Reachability of a single host.
pub trait Pinger {
    /// `Ok(false)` for an unreachable host; `Err` only when pinging is impossible.
    fn ping(&self, target: IpAddr) -> Result<bool>;
}

pub trait RecordResolver {
    /// Whether `host` has at least one record of `kind`.
    fn has_records(&self, host: &str, kind: RecordType) -> Result<bool>;

    fn resolves_a_record(&self, host: &str) -> Result<bool> {
        self.has_records(host, RecordType::A)
    }
}

/// Transport to the smart outlets. Both commands block until the outlet has
/// acknowledged (or refused) the request.
pub trait PowerControl {
    fn power_on(&self, outlet: IpAddr) -> Result<()>;

    fn power_off(&self, outlet: IpAddr) -> Result<()>;

    /// Startup precondition. Transports that rely on external tooling report
    /// [`crate::Error::DependencyMissing`] here.
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Why the monitor is about to block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Before re-scanning a candidate list; `attempt` is the upcoming attempt index.
    Retry { attempt: u32 },
    /// Between switching an outlet off and on.
    PowerToggle { outlet: IpAddr },
    /// Waiting for a rebooted device to come back.
    Recovery { device: Device },
}

pub trait Sleeper {
    fn pause(&self, pause: Pause, duration: Duration);
}

impl<T: Pinger + ?Sized> Pinger for &T {
    fn ping(&self, target: IpAddr) -> Result<bool> {
        (**self).ping(target)
    }
}

impl<T: RecordResolver + ?Sized> RecordResolver for &T {
    fn has_records(&self, host: &str, kind: RecordType) -> Result<bool> {
        (**self).has_records(host, kind)
    }
}

impl<T: PowerControl + ?Sized> PowerControl for &T {
    fn power_on(&self, outlet: IpAddr) -> Result<()> {
        (**self).power_on(outlet)
    }

    fn power_off(&self, outlet: IpAddr) -> Result<()> {
        (**self).power_off(outlet)
    }

    fn ensure_available(&self) -> Result<()> {
        (**self).ensure_available()
    }
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn pause(&self, pause: Pause, duration: Duration) {
        (**self).pause(pause, duration)
    }
}
