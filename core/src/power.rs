//! Outlet handles.
//!
//! A [`Switchboard`] lives for exactly one monitor invocation and hands out one
//! [`PowerSwitch`] per outlet address, however many times that outlet is
//! cycled. When router and modem share an outlet they share the handle too.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use tracing::info;

use rebootr_common::Result;
use rebootr_common::capability::{Pause, PowerControl, Sleeper};

pub struct PowerSwitch<'a> {
    outlet: IpAddr,
    control: &'a dyn PowerControl,
    cycles: u32,
}

impl<'a> PowerSwitch<'a> {
    fn new(outlet: IpAddr, control: &'a dyn PowerControl) -> Self {
        Self {
            outlet,
            control,
            cycles: 0,
        }
    }

    /// Completed power cycles through this handle.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn power_off(&self) -> Result<()> {
        info!(outlet = %self.outlet, "Switching power off for {}...", self.outlet);
        self.control.power_off(self.outlet)
    }

    pub fn power_on(&self) -> Result<()> {
        info!(outlet = %self.outlet, "Switching power on for {}...", self.outlet);
        self.control.power_on(self.outlet)
    }

    /// Off, wait `toggle_delay`, on. Any dispatch failure is returned as is;
    /// the outlet is left in whatever state the failed command produced.
    pub fn reboot(&mut self, sleeper: &dyn Sleeper, toggle_delay: Duration) -> Result<()> {
        self.power_off()?;
        sleeper.pause(Pause::PowerToggle { outlet: self.outlet }, toggle_delay);
        self.power_on()?;
        self.cycles += 1;
        Ok(())
    }
}

pub struct Switchboard<'a> {
    control: &'a dyn PowerControl,
    sleeper: &'a dyn Sleeper,
    toggle_delay: Duration,
    switches: HashMap<IpAddr, PowerSwitch<'a>>,
}

impl<'a> Switchboard<'a> {
    pub fn new(control: &'a dyn PowerControl, sleeper: &'a dyn Sleeper, toggle_delay: Duration) -> Self {
        Self {
            control,
            sleeper,
            toggle_delay,
            switches: HashMap::new(),
        }
    }

    pub fn switch(&mut self, outlet: IpAddr) -> &mut PowerSwitch<'a> {
        let control: &'a dyn PowerControl = self.control;
        self.switches
            .entry(outlet)
            .or_insert_with(|| PowerSwitch::new(outlet, control))
    }

    pub fn reboot(&mut self, outlet: IpAddr) -> Result<()> {
        let sleeper: &'a dyn Sleeper = self.sleeper;
        let toggle_delay: Duration = self.toggle_delay;
        self.switch(outlet).reboot(sleeper, toggle_delay)
    }

    /// Number of distinct outlets handed out so far.
    pub fn handles(&self) -> usize {
        self.switches.len()
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
