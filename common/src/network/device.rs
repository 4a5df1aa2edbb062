use std::fmt;

/// A piece of network equipment sitting behind a switchable outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Router,
    Modem,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Router => f.write_str("router"),
            Device::Modem => f.write_str("modem"),
        }
    }
}

/// The two commands an outlet understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerAction {
    On,
    Off,
}

impl PowerAction {
    /// Relay state as the outlet firmware encodes it.
    pub fn relay_state(self) -> u8 {
        match self {
            PowerAction::On => 1,
            PowerAction::Off => 0,
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerAction::On => f.write_str("on"),
            PowerAction::Off => f.write_str("off"),
        }
    }
}
