//! Adapters that lean on the host operating system.

use std::thread;
use std::time::Duration;

use rebootr_common::capability::{Pause, Sleeper};

pub mod ping;
pub mod smarthome;

/// Blocks the calling thread for the full duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn pause(&self, _pause: Pause, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}
