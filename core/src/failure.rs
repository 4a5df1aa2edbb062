//! Synthetic check failures.
//!
//! With `produce_random_failures` enabled the monitor asks a [`FailureInjector`]
//! before each gated check, and a "yes" makes that check fail without touching
//! the network. This drives the escalation path on a perfectly healthy network.

use std::cell::RefCell;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The checks that can be short-circuited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatedCheck {
    InternetReachable,
    RouterReachable,
    DnsResolves,
}

impl fmt::Display for GatedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatedCheck::InternetReachable => f.write_str("internet-reachable"),
            GatedCheck::RouterReachable => f.write_str("router-reachable"),
            GatedCheck::DnsResolves => f.write_str("dns-resolves"),
        }
    }
}

pub trait FailureInjector {
    /// `true` forces `check` to report failure.
    fn out_of_luck(&self, check: GatedCheck) -> bool;
}

/// Never injects anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFailures;

impl FailureInjector for NoFailures {
    fn out_of_luck(&self, _check: GatedCheck) -> bool {
        false
    }
}

/// Fails each check independently with probability `1 / (odds + 1)`.
#[derive(Debug)]
pub struct RandomFailures {
    odds: u32,
    rng: RefCell<StdRng>,
}

impl RandomFailures {
    pub fn new(odds: u32) -> Self {
        Self {
            odds,
            rng: RefCell::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible sequence of draws for a given seed.
    pub fn seeded(odds: u32, seed: u64) -> Self {
        Self {
            odds,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl FailureInjector for RandomFailures {
    fn out_of_luck(&self, _check: GatedCheck) -> bool {
        self.rng.borrow_mut().random_range(0..=self.odds) == 0
    }
}

impl<T: FailureInjector + ?Sized> FailureInjector for &T {
    fn out_of_luck(&self, check: GatedCheck) -> bool {
        (**self).out_of_luck(check)
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
