use std::io::{self, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rebootr_common::capability::{Pause, Sleeper};
use tracing::debug;

use crate::terminal::colors;

const TICK: Duration = Duration::from_millis(100);
const REFRESH: Duration = Duration::from_secs(1);

/// Spinner currently on screen, if any. Log lines go through it so they do
/// not tear the progress line.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn activate(pb: &ProgressBar) {
    if let Ok(mut active) = ACTIVE.lock() {
        *active = Some(pb.clone());
    }
}

fn deactivate() {
    if let Ok(mut active) = ACTIVE.lock() {
        active.take();
    }
}

fn countdown_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);
    pb.set_style(style);
    pb.enable_steady_tick(TICK);
    pb
}

/// Blocks for `duration` while counting down on screen.
pub fn countdown(label: &str, duration: Duration) {
    let pb = countdown_spinner();
    activate(&pb);

    let deadline: Instant = Instant::now() + duration;
    loop {
        let remaining: Duration = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        // round up so the last second reads "1s", not "0s"
        let secs: u64 = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        pb.set_message(format!(
            "{label}... {}",
            format!("{secs}s left").color(colors::DURATION).bold()
        ));
        thread::sleep(remaining.min(REFRESH));
    }

    deactivate();
    pb.finish_and_clear();
}

/// Sleeper for interactive runs: recovery waits get a countdown, everything
/// else just blocks.
pub struct CountdownSleeper {
    quiet: bool,
}

impl CountdownSleeper {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Sleeper for CountdownSleeper {
    fn pause(&self, pause: Pause, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        match pause {
            Pause::Recovery { device } if !self.quiet => {
                countdown(&format!("Waiting for the {device} to come back"), duration)
            }
            Pause::Retry { attempt } => {
                debug!(attempt, "next pass in {}s", duration.as_secs());
                thread::sleep(duration);
            }
            _ => thread::sleep(duration),
        }
    }
}

pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let active: Option<ProgressBar> = ACTIVE.lock().ok().and_then(|active| active.clone());
        match active {
            Some(pb) => {
                let msg = String::from_utf8_lossy(buf);
                pb.println(msg.trim_end());
                Ok(buf.len())
            }
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
