//! # Monitor Configuration
//!
//! Everything the connectivity monitor needs to know before it starts, gathered
//! into one immutable [`MonitorConfig`]. The CLI builds it from flags and
//! environment variables; tests build it with tiny delays and fixed targets.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::network::target::ProbeTargets;

pub const DEFAULT_POST_REBOOT_DELAY: Duration = Duration::from_secs(180);
pub const DEFAULT_POWER_TOGGLE_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);
/// Synthetic failures hit one check out of `DEFAULT_FAILURE_ODDS + 1`.
pub const DEFAULT_FAILURE_ODDS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one internet host is required")]
    NoInternetHosts,
    #[error("at least one domain to resolve is required")]
    NoDomains,
    #[error("failure odds must be greater than zero when random failures are enabled")]
    ZeroFailureOdds,
}

/// How often a check re-scans its candidate list before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Scan once, never pause.
    pub fn single_attempt() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY)
    }
}

/// Decides whether the router is power-cycled before the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstRebootPolicy {
    /// Reboot the router first only when the router itself does not answer pings.
    #[default]
    RouterUnreachable,
    /// Always reboot the router first.
    Always,
    /// Never reboot the router first; go straight to the modem.
    Never,
}

impl FromStr for FirstRebootPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "router-unreachable" | "unreachable" => Ok(Self::RouterUnreachable),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown first reboot policy: {other}")),
        }
    }
}

impl fmt::Display for FirstRebootPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RouterUnreachable => f.write_str("router-unreachable"),
            Self::Always => f.write_str("always"),
            Self::Never => f.write_str("never"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub router_ip: IpAddr,
    pub router_plug_ip: IpAddr,
    pub modem_plug_ip: IpAddr,
    /// How long a freshly rebooted device is given to come back.
    pub post_reboot_delay: Duration,
    /// Gap between switching an outlet off and on again.
    pub power_toggle_delay: Duration,
    /// Enables synthetic check failures for exercising the escalation path.
    pub produce_random_failures: bool,
    pub failure_odds: u32,
    pub retry: RetryPolicy,
    pub targets: ProbeTargets,
    pub first_reboot: FirstRebootPolicy,
}

impl MonitorConfig {
    pub fn new(router_ip: IpAddr, router_plug_ip: IpAddr, modem_plug_ip: IpAddr) -> Self {
        Self {
            router_ip,
            router_plug_ip,
            modem_plug_ip,
            post_reboot_delay: DEFAULT_POST_REBOOT_DELAY,
            power_toggle_delay: DEFAULT_POWER_TOGGLE_DELAY,
            produce_random_failures: false,
            failure_odds: DEFAULT_FAILURE_ODDS,
            retry: RetryPolicy::default(),
            targets: ProbeTargets::default(),
            first_reboot: FirstRebootPolicy::default(),
        }
    }

    pub fn with_post_reboot_delay(mut self, delay: Duration) -> Self {
        self.post_reboot_delay = delay;
        self
    }

    pub fn with_power_toggle_delay(mut self, delay: Duration) -> Self {
        self.power_toggle_delay = delay;
        self
    }

    pub fn with_random_failures(mut self, enabled: bool, odds: u32) -> Self {
        self.produce_random_failures = enabled;
        self.failure_odds = odds;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_targets(mut self, targets: ProbeTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_first_reboot(mut self, policy: FirstRebootPolicy) -> Self {
        self.first_reboot = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.internet_hosts.is_empty() {
            return Err(ConfigError::NoInternetHosts);
        }
        if self.targets.domains.is_empty() {
            return Err(ConfigError::NoDomains);
        }
        if self.produce_random_failures && self.failure_odds == 0 {
            return Err(ConfigError::ZeroFailureOdds);
        }
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
