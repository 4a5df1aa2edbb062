use std::net::IpAddr;

use rebootr_common::capability::PowerControl;
use rebootr_common::config::DEFAULT_POWER_TOGGLE_DELAY;
use rebootr_common::success;
use rebootr_core::power::Switchboard;

use crate::commands::{PowerCommand, TransportArgs};
use crate::terminal::spinner::CountdownSleeper;

pub fn power(action: PowerCommand, outlet: IpAddr, transport: &TransportArgs, quiet: bool) -> anyhow::Result<()> {
    let control: Box<dyn PowerControl> = transport.power_control();
    control.ensure_available()?;

    let sleeper = CountdownSleeper::new(quiet);
    let mut switchboard = Switchboard::new(control.as_ref(), &sleeper, DEFAULT_POWER_TOGGLE_DELAY);

    match action {
        PowerCommand::On => switchboard.switch(outlet).power_on()?,
        PowerCommand::Off => switchboard.switch(outlet).power_off()?,
        PowerCommand::Cycle => switchboard.reboot(outlet)?,
    }

    success!(%outlet, "Outlet {outlet} switched");
    Ok(())
}
