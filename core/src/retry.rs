//! Bounded re-scanning of a candidate list.
//!
//! A [`RetryingCheck`] walks its candidates in order and stops at the first one
//! the probe accepts. When a full pass finds nothing it pauses for the policy's
//! delay and walks the list again, until the retry budget is spent.

use tracing::debug;

use rebootr_common::Result;
use rebootr_common::capability::{Pause, Sleeper};
use rebootr_common::config::RetryPolicy;

pub struct RetryingCheck<'a> {
    policy: RetryPolicy,
    sleeper: &'a dyn Sleeper,
}

impl<'a> RetryingCheck<'a> {
    pub fn new(policy: RetryPolicy, sleeper: &'a dyn Sleeper) -> Self {
        Self { policy, sleeper }
    }

    /// Returns `Ok(true)` as soon as `probe` accepts a candidate.
    ///
    /// An empty candidate list is `Ok(false)` without probing or pausing.
    /// A probe error ends the check immediately and is not retried.
    pub fn run<T, F>(&self, candidates: &[T], mut probe: F) -> Result<bool>
    where
        F: FnMut(&T) -> Result<bool>,
    {
        if candidates.is_empty() {
            return Ok(false);
        }

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                self.sleeper
                    .pause(Pause::Retry { attempt }, self.policy.retry_delay);
            }

            for candidate in candidates {
                if probe(candidate)? {
                    return Ok(true);
                }
            }

            debug!(attempt, "no candidate answered");
        }

        Ok(false)
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
