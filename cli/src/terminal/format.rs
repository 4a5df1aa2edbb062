use std::net::IpAddr;
use std::time::Duration;

use colored::*;
use rebootr_common::network::device::Device;
use rebootr_core::MonitorState;

use crate::terminal::colors;

pub fn address(ip: &IpAddr) -> ColoredString {
    ip.to_string().color(colors::ADDRESS)
}

pub fn seconds(duration: Duration) -> ColoredString {
    format!("{}s", duration.as_secs()).color(colors::DURATION)
}

pub fn elapsed(duration: Duration) -> ColoredString {
    format!("{:.1}s", duration.as_secs_f64()).color(colors::DURATION)
}

pub fn yes_no(ok: bool) -> ColoredString {
    if ok {
        "yes".color(colors::UP).bold()
    } else {
        "no".color(colors::DOWN).bold()
    }
}

pub fn state_trail(states: &[MonitorState]) -> String {
    states
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}

pub fn reboot_list(reboots: &[Device]) -> String {
    if reboots.is_empty() {
        return "none".to_string();
    }
    reboots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
